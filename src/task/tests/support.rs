//! Shared fixtures for task service tests.

use std::sync::Arc;

use crate::notification::{
    adapters::memory::InMemoryNotificationRepository, domain::Notification,
    services::NotificationService,
};
use crate::principal::{
    adapters::memory::InMemoryPrincipalDirectory,
    domain::{Principal, PrincipalId, Role},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId},
    services::{CreateTaskRequest, TaskLifecycleService, TransitionTaskRequest},
};
use mockable::DefaultClock;
use rstest::fixture;

pub(super) const REPORT_TITLE: &str = "Finalize Q4 Financial Reports";

pub(super) type TestNotifications =
    NotificationService<InMemoryNotificationRepository, InMemoryPrincipalDirectory, DefaultClock>;

pub(super) type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryNotificationRepository,
    InMemoryPrincipalDirectory,
    DefaultClock,
>;

pub(super) fn principal(id: &str, name: &str, role: Role, department: &str) -> Principal {
    let principal_id = PrincipalId::new(id).expect("valid principal id");
    Principal::new(principal_id, name, role, department).expect("valid principal")
}

/// A wired lifecycle service plus the roster it knows about.
pub(super) struct Harness {
    pub(super) lifecycle: Arc<TestLifecycle>,
    pub(super) notifications: Arc<TestNotifications>,
    pub(super) tasks: Arc<InMemoryTaskRepository>,
    pub(super) directory: Arc<InMemoryPrincipalDirectory>,
    pub(super) manager: Principal,
    pub(super) employee: Principal,
    pub(super) colleague: Principal,
    pub(super) assistant: Principal,
}

#[fixture]
pub(super) fn harness() -> Harness {
    let manager = principal("mgr1", "Arun Sharma", Role::Manager, "Operations");
    let employee = principal("emp1", "Priya Verma", Role::Employee, "Operations");
    let colleague = principal("emp2", "Sunita Nair", Role::Employee, "Safety");
    let assistant = principal("doc1", "Vikram Singh", Role::DocAssistant, "Admin");
    let directory = Arc::new(
        InMemoryPrincipalDirectory::with_principals([
            manager.clone(),
            employee.clone(),
            colleague.clone(),
            assistant.clone(),
        ])
        .expect("directory should accept roster"),
    );
    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let notifications = Arc::new(NotificationService::new(
        Arc::new(InMemoryNotificationRepository::new()),
        Arc::clone(&directory),
        Arc::clone(&clock),
    ));
    let lifecycle = Arc::new(TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&notifications),
        Arc::clone(&directory),
        clock,
    ));

    Harness {
        lifecycle,
        notifications,
        tasks,
        directory,
        manager,
        employee,
        colleague,
        assistant,
    }
}

impl Harness {
    /// Manager assigns the quarterly report to the employee.
    pub(super) async fn assign_report(&self) -> Task {
        let request = CreateTaskRequest::new(REPORT_TITLE, self.employee.id().clone(), "2025-10-15")
            .with_priority("high");
        self.lifecycle
            .create_task(&self.manager, request)
            .await
            .expect("manager should be able to assign the report")
    }

    /// Assigns the report and walks it to `submitted_for_review`.
    pub(super) async fn submitted_report(&self) -> Task {
        let task = self.assign_report().await;
        self.move_as(&self.employee, task.id(), "working").await;
        self.move_as(&self.employee, task.id(), "submitted_for_review")
            .await
    }

    pub(super) async fn move_as(&self, actor: &Principal, task_id: TaskId, target: &str) -> Task {
        self.lifecycle
            .transition_task(actor, TransitionTaskRequest::new(task_id, target))
            .await
            .expect("transition should succeed")
    }

    pub(super) async fn inbox(&self, owner: &Principal) -> Vec<Notification> {
        self.notifications
            .list_for_user(owner.id(), None)
            .await
            .expect("inbox lookup should succeed")
    }
}
