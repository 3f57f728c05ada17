#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use nutriplan_import::entry::background::OptionsPage;
use nutriplan_import::error::TransportError;
use nutriplan_import::form::{FormInput, FormValues};
use nutriplan_import::import::ImportRequest;
use nutriplan_import::notify::{Notification, Notifier};
use nutriplan_import::transport::Transport;

/// Transport that answers every request with a fixed status, or fails.
pub struct MockTransport {
    status: Option<u16>,
    pub sent: Mutex<Vec<ImportRequest>>,
}

impl MockTransport {
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            status: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<ImportRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ImportRequest) -> Result<u16, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        self.status
            .ok_or_else(|| TransportError("connection refused".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen.lock().unwrap().push(notification.clone());
    }
}

#[derive(Default)]
pub struct RecordingOptionsPage {
    pub opened: AtomicUsize,
}

impl RecordingOptionsPage {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl OptionsPage for RecordingOptionsPage {
    fn open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
    }
}

/// Form that replays canned submissions and remembers what it was shown.
#[derive(Default)]
pub struct ScriptedForm {
    submissions: VecDeque<(String, String)>,
    pub shown: Vec<FormValues>,
    pub statuses: Vec<(String, bool)>,
}

impl ScriptedForm {
    pub fn new(submissions: &[(&str, &str)]) -> Self {
        Self {
            submissions: submissions
                .iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

impl FormInput for ScriptedForm {
    fn read(&mut self, current: &FormValues) -> io::Result<Option<(String, String)>> {
        self.shown.push(current.clone());
        Ok(self.submissions.pop_front())
    }

    fn show_status(&mut self, message: &str, is_error: bool) {
        self.statuses.push((message.to_string(), is_error));
    }
}
