mod common;

use std::sync::Arc;

use common::{MockTransport, RecordingNotifier, RecordingOptionsPage, ScriptedForm};
use nutriplan_import::entry::background::{Background, CONFIG_REQUIRED_TITLE};
use nutriplan_import::entry::injected::{Injected, InjectedRun, SENDING_MESSAGE};
use nutriplan_import::entry::settings_page::SettingsPage;
use nutriplan_import::form::{FormValues, ValidationOutcome};
use nutriplan_import::import::{send_url_to_api, Outcome};
use nutriplan_import::notify::Notification;
use nutriplan_import::settings::{check_settings, Settings, API_TOKEN_KEY, APP_URL_KEY};
use nutriplan_import::store::{LocalStore, MemoryStore, SyncedStore};

const PAGE: &str = "https://recipes.example/lemon-tart";

fn configured() -> MemoryStore {
    MemoryStore::with_values([(API_TOKEN_KEY, "tok"), (APP_URL_KEY, "https://np.example.com/")])
}

#[tokio::test]
async fn outcomes_follow_status_codes() {
    let settings = Settings::new("tok", "https://np.example.com");
    let cases = [
        (200, Outcome::Success),
        (401, Outcome::AuthError),
        (422, Outcome::ValidationError),
        (500, Outcome::ServerError),
        (418, Outcome::UnexpectedError(418)),
    ];
    for (status, expected) in cases {
        let transport = MockTransport::status(status);
        assert_eq!(send_url_to_api(&transport, PAGE, &settings).await, expected);
        assert_eq!(transport.sent().len(), 1);
    }

    let transport = MockTransport::unreachable();
    assert_eq!(send_url_to_api(&transport, PAGE, &settings).await, Outcome::ConnectionError);
}

#[tokio::test]
async fn repeated_sends_are_not_deduplicated() {
    let settings = Settings::new("tok", "https://np.example.com");
    let transport = MockTransport::status(200);
    send_url_to_api(&transport, PAGE, &settings).await;
    send_url_to_api(&transport, PAGE, &settings).await;
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn injected_sends_with_stored_settings() {
    let store = configured();
    let transport = MockTransport::status(200);
    let notifier = RecordingNotifier::default();
    let mut form = ScriptedForm::default();

    let run = Injected::new(&store, &transport, &notifier)
        .run(PAGE, &mut form)
        .await
        .unwrap();

    assert_eq!(run, InjectedRun::Imported(Outcome::Success));
    assert!(form.shown.is_empty());

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].page_url, PAGE);
    assert_eq!(sent[0].endpoint(), "https://np.example.com/api/recipes/import-via-extension");

    let seen = notifier.seen();
    assert_eq!(seen[0], Notification::info(SENDING_MESSAGE));
    assert_eq!(seen[1], Outcome::Success.panel_notification());
}

#[tokio::test]
async fn injected_reports_failures_as_errors() {
    let store = configured();
    let transport = MockTransport::unreachable();
    let notifier = RecordingNotifier::default();

    let run = Injected::new(&store, &transport, &notifier)
        .run(PAGE, &mut ScriptedForm::default())
        .await
        .unwrap();

    assert_eq!(run, InjectedRun::Imported(Outcome::ConnectionError));
    let last = notifier.seen().pop().unwrap();
    assert!(last.is_error);
    assert_eq!(last.message, "Connection Error: Could not connect to NutriPlan.");
}

#[tokio::test]
async fn injected_without_settings_opens_form_and_never_sends() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().join(".nutriplan.env"));
    let transport = MockTransport::status(200);
    let notifier = RecordingNotifier::default();
    let mut form = ScriptedForm::new(&[("", "https://np.example.com"), (" tok ", "https://np.example.com")]);

    let run = Injected::new(&store, &transport, &notifier)
        .run(PAGE, &mut form)
        .await
        .unwrap();

    assert_eq!(
        run,
        InjectedRun::Configured(Some(Settings::new("tok", "https://np.example.com")))
    );
    assert!(transport.sent().is_empty());
    assert_eq!(
        form.statuses,
        vec![
            ("Please enter your API token.".to_string(), true),
            ("Settings saved successfully!".to_string(), false),
        ]
    );
    assert_eq!(notifier.seen(), vec![Notification::info("Settings saved successfully!")]);

    let stored = check_settings(&store).await.unwrap().unwrap();
    assert_eq!(stored, Settings::new("tok", "https://np.example.com"));
}

#[tokio::test]
async fn injected_form_cancel_changes_nothing() {
    let store = MemoryStore::with_values([(APP_URL_KEY, "https://np.example.com")]);
    let transport = MockTransport::status(200);
    let notifier = RecordingNotifier::default();
    let mut form = ScriptedForm::default();

    let run = Injected::new(&store, &transport, &notifier)
        .run(PAGE, &mut form)
        .await
        .unwrap();

    assert_eq!(run, InjectedRun::Configured(None));
    assert_eq!(form.shown[0].app_url.as_deref(), Some("https://np.example.com"));
    assert!(notifier.seen().is_empty());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn background_without_settings_opens_settings_page() {
    let transport = Arc::new(MockTransport::status(200));
    let notifier = Arc::new(RecordingNotifier::default());
    let options = Arc::new(RecordingOptionsPage::default());
    let background = Background::new(
        Arc::new(MemoryStore::with_values([(API_TOKEN_KEY, "tok")])),
        transport.clone(),
        notifier.clone(),
        options.clone(),
    );

    let result = background.handle_action_click(PAGE).await.unwrap();

    assert!(result.opened_settings);
    assert_eq!(result.outcome, None);
    assert_eq!(result.notification.title.as_deref(), Some(CONFIG_REQUIRED_TITLE));
    assert_eq!(options.opened(), 1);
    assert_eq!(notifier.seen(), vec![result.notification]);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn background_sends_and_notifies_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let store = SyncedStore::new(dir.path().join("sync.json"), "nutriplan-import");
    SettingsPage::new(&store)
        .save("tok", "https://np.example.com")
        .await
        .unwrap();

    let transport = Arc::new(MockTransport::status(401));
    let notifier = Arc::new(RecordingNotifier::default());
    let options = Arc::new(RecordingOptionsPage::default());
    let background = Background::new(Arc::new(store), transport.clone(), notifier.clone(), options.clone());

    let result = background.handle_action_click(PAGE).await.unwrap();

    assert_eq!(result.outcome, Some(Outcome::AuthError));
    assert!(!result.opened_settings);
    assert_eq!(options.opened(), 0);
    assert_eq!(
        notifier.seen(),
        vec![Notification::titled(
            "Authentication Error",
            "Invalid API token. Please check your settings.",
            true
        )]
    );
    assert_eq!(transport.sent()[0].settings.api_token, "tok");
}

#[tokio::test]
async fn settings_page_prepopulates_stored_values() {
    let store = MemoryStore::with_values([(API_TOKEN_KEY, "abc"), (APP_URL_KEY, "https://np.example.com")]);
    let values = SettingsPage::new(&store).load().await.unwrap();
    assert_eq!(
        values,
        FormValues {
            api_token: Some("abc".to_string()),
            app_url: Some("https://np.example.com".to_string()),
        }
    );
}

#[tokio::test]
async fn settings_page_validation_results() {
    let store = MemoryStore::new();
    let page = SettingsPage::new(&store);

    assert_eq!(page.save("", "https://x.com").await.unwrap(), ValidationOutcome::MissingToken);
    assert_eq!(page.save("tok", "").await.unwrap(), ValidationOutcome::MissingUrl);
    assert_eq!(page.save("tok", "not-a-url").await.unwrap(), ValidationOutcome::InvalidUrl);
    assert!(check_settings(&store).await.unwrap().is_none());

    let saved = page.save("tok", "https://x.com").await.unwrap();
    assert_eq!(saved, ValidationOutcome::Saved(Settings::new("tok", "https://x.com")));
    assert_eq!(
        check_settings(&store).await.unwrap(),
        Some(Settings::new("tok", "https://x.com"))
    );
}

#[tokio::test]
async fn settings_page_edit_keeps_form_open_after_error() {
    let store = MemoryStore::with_values([(API_TOKEN_KEY, "abc"), (APP_URL_KEY, "https://np.example.com")]);
    let mut form = ScriptedForm::new(&[("abc", "nope"), ("abc", "https://np2.example.com")]);

    let saved = SettingsPage::new(&store).edit(&mut form).await.unwrap();

    assert_eq!(saved, Some(Settings::new("abc", "https://np2.example.com")));
    assert_eq!(form.shown[0].app_url.as_deref(), Some("https://np.example.com"));
    assert_eq!(form.shown[1].app_url.as_deref(), Some("nope"));
    assert!(form.statuses[0].1);
}
