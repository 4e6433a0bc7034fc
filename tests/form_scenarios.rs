use user_desk::{
    ensure_schema, ActionError, Outcome, SqliteUserStore, StoreConfig, User, UserController,
    UserStore, ValidationError,
};

fn controller() -> (tempfile::TempDir, UserController<SqliteUserStore>) {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("users.sqlite"));
    ensure_schema(&config).unwrap();
    let mut controller = UserController::new(SqliteUserStore::new(config));
    controller.load().unwrap();
    (dir, controller)
}

fn add(controller: &mut UserController<SqliteUserStore>, name: &str, email: &str) {
    controller.set_name(name);
    controller.set_email(email);
    controller.create().unwrap();
}

#[test]
fn visible_list_matches_store_after_each_mutation() {
    let (_dir, mut controller) = controller();

    add(&mut controller, "Ann", "ann@x.com");
    assert_eq!(controller.users(), controller.store().list_all().unwrap().as_slice());

    add(&mut controller, "Bo", "bo@x.com");
    controller.select_row(0);
    controller.set_name("Ann B");
    controller.update().unwrap();
    assert_eq!(controller.users(), controller.store().list_all().unwrap().as_slice());

    controller.select_row(1);
    let pending = controller.request_delete().unwrap();
    controller.resolve_delete(pending, true).unwrap();
    assert_eq!(controller.users(), controller.store().list_all().unwrap().as_slice());
    assert_eq!(controller.users(), &[User::new(1, "Ann B", "ann@x.com")]);
}

#[test]
fn create_update_delete_scenario() {
    let (_dir, mut controller) = controller();

    add(&mut controller, "Ann", "ann@x.com");
    assert_eq!(controller.users(), &[User::new(1, "Ann", "ann@x.com")]);

    controller.select_row(0);
    controller.set_name("Ann B");
    controller.set_email("annb@x.com");
    assert_eq!(controller.update().unwrap(), Outcome::Updated { id: 1 });
    assert_eq!(controller.users(), &[User::new(1, "Ann B", "annb@x.com")]);

    controller.select_row(0);
    let pending = controller.request_delete().unwrap();
    assert_eq!(
        controller.resolve_delete(pending, true).unwrap(),
        Some(Outcome::Deleted { id: 1 })
    );
    assert!(controller.users().is_empty());
}

#[test]
fn blank_name_leaves_store_untouched() {
    let (_dir, mut controller) = controller();
    add(&mut controller, "Ann", "ann@x.com");
    let before = controller.store().list_all().unwrap();

    controller.set_name("");
    controller.set_email("e@x.com");
    let err = controller.create().unwrap_err();

    assert!(matches!(
        err,
        ActionError::Validation(ValidationError::MissingFields)
    ));
    assert_eq!(controller.store().list_all().unwrap(), before);
    assert_eq!(controller.buffer().email, "e@x.com");
}
