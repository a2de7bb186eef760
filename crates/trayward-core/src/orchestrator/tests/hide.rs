use super::*;

#[test]
fn blank_exe_name_is_an_invalid_process_name() {
    let h = Setup::default().build();

    for exe_path in ["", r"C:\Apps\"] {
        let entry = ManagedAppEntry {
            exe_path: exe_path.into(),
            ..h.entry(true)
        };

        let outcome = h.service.hide_existing(&entry, 10, &CancelToken::new());

        assert_eq!(outcome.message, Message::InvalidProcessName, "{exe_path:?}");
    }
    assert_eq!(h.counts(), (0, 0, 0, 0));
}

#[test]
fn hide_is_verified_once_window_drops_out_of_view() {
    // Arrange: close makes the app drop to its tray without exiting.
    let h = Setup::default().build();
    h.seed(h.app_window(0x20, 9));
    h.set_effects(Effect::MakeInvisible, Effect::Ignore);

    // Act
    let outcome = h.service.hide_existing(&h.entry(true), 10, &CancelToken::new());

    // Assert
    assert_eq!(
        outcome,
        Outcome::acted("App", ActionKind::Hide, Message::ManagedExisting)
    );
    let world = h.world.lock().unwrap();
    assert_eq!(world.closes, vec![0x20]);
    assert!(world.hides.is_empty());
    assert!(world.windows.iter().any(|w| w.handle == 0x20 && !w.is_visible));
}

#[test]
fn hide_is_verified_while_window_is_still_listed_invisible() {
    // Arrange
    let h = Setup {
        world: World {
            lists_invisible: true,
            ..Default::default()
        },
        ..Default::default()
    }
    .build();
    h.seed(h.app_window(0x21, 9));
    h.set_effects(Effect::Ignore, Effect::MakeInvisible);

    // Act
    let outcome = h.service.hide_existing(&h.entry(true), 0, &CancelToken::new());

    // Assert: the hide request's first check sees the invisible entry.
    assert_eq!(outcome.message, Message::ManagedExisting);
    assert_eq!(h.world.lock().unwrap().hides, vec![0x21]);
    assert_eq!(h.sleeps(), vec![Duration::from_millis(300); 3]);
}

#[test]
fn hide_falls_back_to_hide_request_when_close_is_ignored() {
    // Arrange
    let h = Setup::default().build();
    h.seed(h.app_window(0x20, 9));
    h.set_effects(Effect::Ignore, Effect::MakeInvisible);

    // Act
    let outcome = h.service.hide_existing(&h.entry(true), 10, &CancelToken::new());

    // Assert
    assert_eq!(outcome.message, Message::ManagedExisting);
    let world = h.world.lock().unwrap();
    assert_eq!(world.closes, vec![0x20]);
    assert_eq!(world.hides, vec![0x20]);
    drop(world);
    // Only the failed close verification waited.
    assert_eq!(h.sleeps(), vec![Duration::from_millis(300); 3]);
}

#[test]
fn no_existing_window_exhausts_rounds() {
    let h = Setup::default().build();

    let outcome = h.service.hide_existing(&h.entry(true), 2, &CancelToken::new());

    assert_eq!(outcome.message, Message::NoExistingWindowManaged);
    assert!(outcome.summary_line().contains("UIPI"));
    assert_eq!(h.counts().0, 5);
    assert_eq!(h.sleeps().len(), 4);
}

#[test]
fn running_app_is_skipped_without_auto_hide() {
    // Arrange
    let h = Setup::default().build();
    h.seed(h.app_window(0x20, 9));

    // Act
    let outcome = h
        .service
        .start_and_manage(&h.entry(false), 10, &CancelToken::new());

    // Assert
    assert_eq!(outcome, Outcome::done("App", Message::AlreadyRunningSkipped));
    let (_, launches, closes, _) = h.counts();
    assert_eq!((launches, closes), (0, 0));
    assert!(h.logged("skip start: already running App"));
}

#[test]
fn running_app_with_auto_hide_gets_its_window_hidden() {
    // Arrange
    let h = Setup::default().build();
    h.seed(h.app_window(0x20, 9));

    // Act
    let outcome = h
        .service
        .start_and_manage(&h.entry(true), 10, &CancelToken::new());

    // Assert
    assert_eq!(
        outcome,
        Outcome::acted(
            "App",
            ActionKind::Hide,
            Message::AlreadyRunningManagedExisting
        )
    );
    assert_eq!(h.counts().1, 0);
}

#[test]
fn running_app_left_alone_when_hiding_fails() {
    // Arrange
    let h = Setup::default().build();
    h.seed(h.app_window(0x20, 9));
    h.set_effects(Effect::Ignore, Effect::Ignore);

    // Act
    let outcome = h
        .service
        .start_and_manage(&h.entry(true), 0, &CancelToken::new());

    // Assert
    assert_eq!(outcome, Outcome::done("App", Message::AlreadyRunningSkipped));
    assert_eq!(h.counts().1, 0);
}

#[test]
fn rejected_request_is_logged_and_not_verified() {
    // Arrange
    struct Refusing;
    impl WindowActions for Refusing {
        fn request_close(&self, _handle: WindowHandle) -> ActionResult {
            Ok(false)
        }
        fn request_hide(&self, handle: WindowHandle) -> ActionResult {
            Err(crate::window::ActionError::InvalidWindow(handle))
        }
    }
    let h = Setup::default().build();
    h.seed(h.app_window(0x20, 9));
    let service = Service::new(
        Box::new(FakeEnumerator(h.world.clone())),
        Box::new(Refusing),
        Box::new(crate::launch::CommandLauncher),
        Box::new(RecordingLog(h.lines.clone())),
    )
    .with_clock(Box::new(FakeClock {
        sleeps: h.sleeps.clone(),
        cancel_on: None,
    }));

    // Act
    let outcome = service.hide_existing(&h.entry(true), 0, &CancelToken::new());

    // Assert: one round enumeration, no verification enumerations.
    assert_eq!(outcome.message, Message::NoExistingWindowManaged);
    assert_eq!(h.counts().0, 1);
    assert!(h.logged("action request failed request=close target=0x20"));
    assert!(h.logged("action request failed request=hide target=0x20 err="));
}
