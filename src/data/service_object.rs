//! Service objects — named collections owning their per-operation
//! handler registries.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{DataContext, DataHandler};
use crate::completion::Completion;
use crate::registry::HandlerTable;

/// The closed set of data operations a service object can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOperation {
    Insert,
    InsertMany,
    DeleteById,
    DeleteAll,
    DeleteByQuery,
    Update,
    GetById,
    GetAll,
    GetByQuery,
    GetCount,
    GetCountByQuery,
}

impl DataOperation {
    /// Every operation, in the order discovery enumerates them.
    pub const ALL: [DataOperation; 11] = [
        DataOperation::Insert,
        DataOperation::InsertMany,
        DataOperation::DeleteById,
        DataOperation::DeleteAll,
        DataOperation::DeleteByQuery,
        DataOperation::Update,
        DataOperation::GetById,
        DataOperation::GetAll,
        DataOperation::GetByQuery,
        DataOperation::GetCount,
        DataOperation::GetCountByQuery,
    ];

    /// Wire name, e.g. `onInsert`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataOperation::Insert => "onInsert",
            DataOperation::InsertMany => "onInsertMany",
            DataOperation::DeleteById => "onDeleteById",
            DataOperation::DeleteAll => "onDeleteAll",
            DataOperation::DeleteByQuery => "onDeleteByQuery",
            DataOperation::Update => "onUpdate",
            DataOperation::GetById => "onGetById",
            DataOperation::GetAll => "onGetAll",
            DataOperation::GetByQuery => "onGetByQuery",
            DataOperation::GetCount => "onGetCount",
            DataOperation::GetCountByQuery => "onGetCountByQuery",
        }
    }
}

impl fmt::Display for DataOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name outside the fixed operation set was used to register or resolve
/// a data handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOperation(pub String);

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid data operation: {}", self.0)
    }
}

impl Error for InvalidOperation {}

impl FromStr for DataOperation {
    type Err = InvalidOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataOperation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| InvalidOperation(s.to_string()))
    }
}

/// A named collection/resource with its own operation registry.
///
/// Obtained from [`DataRegistry::service_object`](super::DataRegistry::service_object);
/// registrars chain:
///
/// ```ignore
/// service
///     .data()
///     .service_object("widgets")
///     .on_insert(|ctx, mut complete, _modules| {
///         complete.set_body(json!({ "_id": "w1" })).created().next();
///     })
///     .on_get_by_id(|ctx, mut complete, _modules| {
///         complete.set_body(json!({ "_id": ctx.entity_id })).ok().done();
///     });
/// ```
pub struct ServiceObject<M> {
    name: String,
    operations: HandlerTable<DataOperation, DataHandler<M>>,
}

macro_rules! operation_registrars {
    ($( $fn_name:ident => $op:ident ),+ $(,)?) => {
        $(
            #[doc = concat!("Register the `", stringify!($op), "` handler.")]
            pub fn $fn_name<F>(&self, handler: F) -> &Self
            where
                F: Fn(DataContext, Completion, M) + Send + Sync + 'static,
            {
                self.register(DataOperation::$op, handler)
            }
        )+
    };
}

impl<M> ServiceObject<M> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        ServiceObject {
            name: name.into(),
            operations: HandlerTable::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store or overwrite the handler for `operation`.
    pub fn register<F>(&self, operation: DataOperation, handler: F) -> &Self
    where
        F: Fn(DataContext, Completion, M) + Send + Sync + 'static,
    {
        self.operations.register(operation, Arc::new(handler));
        self
    }

    /// Register by wire name. Names outside the fixed operation set are a
    /// protocol error.
    pub fn register_named<F>(&self, operation: &str, handler: F) -> Result<&Self, InvalidOperation>
    where
        F: Fn(DataContext, Completion, M) + Send + Sync + 'static,
    {
        Ok(self.register(operation.parse()?, handler))
    }

    operation_registrars! {
        on_insert => Insert,
        on_insert_many => InsertMany,
        on_delete_by_id => DeleteById,
        on_delete_all => DeleteAll,
        on_delete_by_query => DeleteByQuery,
        on_update => Update,
        on_get_by_id => GetById,
        on_get_all => GetAll,
        on_get_by_query => GetByQuery,
        on_get_count => GetCount,
        on_get_count_by_query => GetCountByQuery,
    }

    /// Look up the registered handler for `operation`, if any.
    pub fn resolve(&self, operation: DataOperation) -> Option<DataHandler<M>> {
        self.operations.resolve(&operation)
    }

    /// Registered operations, in registration order.
    pub fn handlers(&self) -> Vec<DataOperation> {
        self.operations.keys()
    }

    /// Remove one operation registration.
    pub fn unregister(&self, operation: DataOperation) -> bool {
        self.operations.unregister(&operation)
    }

    /// Empty this service object's registry.
    pub fn clear_all(&self) {
        self.operations.clear_all();
    }
}

/// The data-domain registry: service-object name to [`ServiceObject`],
/// created lazily on first reference.
pub struct DataRegistry<M> {
    objects: HandlerTable<String, Arc<ServiceObject<M>>>,
}

impl<M> DataRegistry<M> {
    pub(crate) fn new() -> Self {
        DataRegistry {
            objects: HandlerTable::new(),
        }
    }

    /// Get or create the service object named `name`. Reference-stable:
    /// repeat calls return the same instance.
    pub fn service_object(&self, name: &str) -> Arc<ServiceObject<M>> {
        self.objects
            .get_or_insert_with(name.to_string(), || Arc::new(ServiceObject::new(name)))
    }

    /// Look up an existing service object without creating it.
    pub fn lookup(&self, name: &str) -> Option<Arc<ServiceObject<M>>> {
        self.objects.resolve(&name.to_string())
    }

    /// Known service-object names, in registration order.
    pub fn service_object_names(&self) -> Vec<String> {
        self.objects.keys()
    }

    /// Delete one service object and all its handlers.
    pub fn remove_service_object(&self, name: &str) -> bool {
        self.objects.unregister(&name.to_string())
    }

    /// Drop every service object.
    pub fn clear_all(&self) {
        self.objects.clear_all();
    }
}
