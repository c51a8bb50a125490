//! Shared helpers: task builders and a synchronous dispatch wrapper.

use std::time::Duration;

use flex_sdk::{FlexService, HookType, Task, TaskType};

/// Dispatch a task and block until its callback fires.
///
/// Handlers may complete from other threads, so the callback is bridged
/// through a channel; a task that never completes fails the test instead
/// of hanging it.
pub fn dispatch<M>(service: &FlexService<M>, task: Task, modules: M) -> Task {
    let (tx, rx) = std::sync::mpsc::channel();
    service.process(task, modules, move |task| {
        tx.send(task).expect("test receiver dropped");
    });
    rx.recv_timeout(Duration::from_secs(2))
        .expect("task never completed")
}

pub fn data_task(method: &str, service_object: &str) -> Task {
    let mut task = Task::new(TaskType::Data);
    task.method = Some(method.to_string());
    task.request.service_object_name = Some(service_object.to_string());
    task
}

pub fn functions_task(name: &str, hook: Option<HookType>) -> Task {
    let mut task = Task::new(TaskType::Functions);
    task.task_name = Some(name.to_string());
    task.hook_type = hook;
    task
}

pub fn auth_task(name: &str) -> Task {
    let mut task = Task::new(TaskType::Auth);
    task.task_name = Some(name.to_string());
    task
}
