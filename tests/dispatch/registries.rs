//! Registry behavior through the public surface: resolve-after-register,
//! NotImplemented fallbacks, enumeration, and clearing.

use std::sync::Arc;

use flex_sdk::{DataOperation, FlexService};
use serde_json::json;

use crate::support::{auth_task, data_task, dispatch, functions_task};

#[test]
fn resolve_after_register_behaves_as_the_handler() {
    let service: FlexService<()> = FlexService::new();
    service
        .functions()
        .register("greet", |_ctx, mut complete, _modules| {
            complete.set_body(json!({ "hello": true })).ok().done();
        });

    let completed = dispatch(&service, functions_task("greet", None), ());
    assert_eq!(completed.response.status_code, Some(200));
    assert_eq!(completed.response.body, json!({ "hello": true }));
}

#[test]
fn unregistered_data_operation_falls_back_to_501() {
    let service: FlexService<()> = FlexService::new();
    // Service object exists but has no onGetAll handler.
    service
        .data()
        .service_object("widgets")
        .on_insert(|_ctx, mut complete, _modules| complete.created().done());

    let completed = dispatch(&service, data_task("GET", "widgets"), ());
    assert_eq!(completed.response.status_code, Some(501));
    assert_eq!(completed.response.body["error"], "NotImplemented");
}

#[test]
fn unknown_service_object_falls_back_to_501() {
    let service: FlexService<()> = FlexService::new();
    let completed = dispatch(&service, data_task("GET", "nowhere"), ());
    assert_eq!(completed.response.status_code, Some(501));
    // Dispatch never lazily creates service objects.
    assert!(service.data().service_object_names().is_empty());
}

#[test]
fn unregistered_function_falls_back_to_501() {
    let service: FlexService<()> = FlexService::new();
    let completed = dispatch(&service, functions_task("missing", None), ());
    assert_eq!(completed.response.status_code, Some(501));
    assert_eq!(completed.response.body["error"], "NotImplemented");
}

#[test]
fn unregistered_auth_handler_falls_back_to_server_error() {
    let service: FlexService<()> = FlexService::new();
    let completed = dispatch(&service, auth_task("missing"), ());
    assert_eq!(completed.response.status_code, Some(401));
    assert_eq!(completed.response.body["error"], "server_error");
}

#[test]
fn enumeration_tracks_registered_minus_removed() {
    let service: FlexService<()> = FlexService::new();
    let functions = service.functions();
    functions.register("a", |_, mut c, _| c.done());
    functions.register("b", |_, mut c, _| c.done());
    functions.register("a", |_, mut c, _| c.done()); // overwrite, no duplicate
    assert_eq!(functions.handler_names(), vec!["a", "b"]);

    assert!(functions.unregister("a"));
    assert_eq!(functions.handler_names(), vec!["b"]);

    functions.clear_all();
    assert!(functions.handler_names().is_empty());
    functions.clear_all();
    assert!(functions.handler_names().is_empty());
}

#[test]
fn service_object_identity_is_stable() {
    let service: FlexService<()> = FlexService::new();
    let first = service.data().service_object("widgets");
    let second = service.data().service_object("widgets");
    assert!(Arc::ptr_eq(&first, &second));

    // Registering through either reference lands in the same registry.
    first.on_insert(|_, mut c, _| c.created().done());
    assert_eq!(second.handlers(), vec![DataOperation::Insert]);
}

#[test]
fn independent_service_instances_do_not_share_registries() {
    let one: FlexService<()> = FlexService::new();
    let two: FlexService<()> = FlexService::new();
    one.functions().register("onlyInOne", |_, mut c, _| c.done());

    assert_eq!(one.functions().handler_names(), vec!["onlyInOne"]);
    assert!(two.functions().handler_names().is_empty());

    let completed = dispatch(&two, functions_task("onlyInOne", None), ());
    assert_eq!(completed.response.status_code, Some(501));
}

// Convention-pattern registration, one module per handler.
mod handlers {
    pub mod echo {
        use flex_sdk::{Completion, FunctionsContext};

        pub const NAME: &str = "echo";

        pub fn handle(ctx: FunctionsContext, mut complete: Completion, _modules: ()) {
            complete.set_body(ctx.body).ok().done();
        }
    }

    pub mod shout {
        use flex_sdk::{Completion, FunctionsContext};
        use serde_json::json;

        pub const NAME: &str = "shout";

        pub fn handle(_ctx: FunctionsContext, mut complete: Completion, _modules: ()) {
            complete.set_body(json!("HEY")).ok().done();
        }
    }
}

#[test]
fn register_functions_macro_follows_the_convention() {
    let service: FlexService<()> = FlexService::new();
    flex_sdk::register_functions!(service.functions(), handlers::echo, handlers::shout);

    assert_eq!(service.functions().handler_names(), vec!["echo", "shout"]);

    let mut task = functions_task("echo", None);
    task.request.body = json!({ "ping": 1 });
    let completed = dispatch(&service, task, ());
    assert_eq!(completed.response.body, json!({ "ping": 1 }));
}
