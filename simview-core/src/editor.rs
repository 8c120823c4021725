//! Model behind the code editor panel.
//!
//! Keeps the buffer, what the server last received, console output and
//! error markers, and pushes edits to the server through a throttle. Layout
//! values live in the shared [`ConfigContext`]; the session reacts to
//! changes through its subscription.

use crate::error::{EditorError, ProtocolError, SyncError};
use crate::protocol::{EditorSync, ServerMessage};
use crate::settings::{ConfigContext, ConfigKey, Subscription};
use crate::sync::{
    Clock, Millis, Scheduler, SendOutcome, SyncSink, ThrottleState, ThrottledSync, TimerHandle,
};
use crate::validation::Validator;
use connection::Connection;

pub const SYNC_INTERVAL_MS: Millis = 150;
pub const AUTO_UPDATE_PERIOD_MS: Millis = 200;
pub const RESIZE_THROTTLE_MS: Millis = 66;
pub const MIN_EDITOR_WIDTH: f64 = 50.0;
pub const MIN_FONT_SIZE: i32 = 6;
pub const MIN_CONSOLE_HEIGHT: f64 = 20.0;
/// Space kept free for the rest of the page next to the editor.
const WINDOW_MARGIN: f64 = 100.0;
const CONSOLE_HEADROOM: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMarker {
    /// 0-based row in the buffer.
    pub row: u32,
    pub short_msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleOutput {
    pub stdout: String,
    pub stderr: String,
}

/// What the panel currently shows, derived from the settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    pub width: f64,
    pub max_width: f64,
    pub height: f64,
    pub console_height: f64,
    pub hidden: bool,
    pub font_size: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    ToggleEditor,
    Save,
    FontIncrease,
    FontDecrease,
    ToggleAutoUpdate,
    UpdateDisplay,
}

/// Serializes editor payloads onto the server connection.
pub struct ServerLink {
    connection: Box<dyn Connection<String>>,
}

impl ServerLink {
    pub fn new(connection: Box<dyn Connection<String>>) -> Self {
        Self { connection }
    }
}

impl SyncSink<EditorSync> for ServerLink {
    fn send(&mut self, payload: &EditorSync) -> Result<SendOutcome, SyncError> {
        let text = payload
            .to_json()
            .map_err(|err| SyncError::Rejected(err.to_string()))?;
        self.connection.send(text)?;
        Ok(SendOutcome::Delivered)
    }
}

/// Applies a coalesced browser-window width to the editor layout.
struct WindowResize<'a> {
    view: &'a mut EditorView,
    config: &'a ConfigContext,
}

impl SyncSink<f64> for WindowResize<'_> {
    fn send(&mut self, window_width: &f64) -> Result<SendOutcome, SyncError> {
        self.view.max_width = (window_width - WINDOW_MARGIN).max(MIN_EDITOR_WIDTH);
        if self.config.editor_width() > self.view.max_width {
            self.config
                .set_editor_width(self.view.max_width)
                .map_err(|err| SyncError::Rejected(err.to_string()))?;
        }
        self.view.width = Validator::clip(
            self.config.editor_width(),
            MIN_EDITOR_WIDTH,
            self.view.max_width,
        );
        Ok(SendOutcome::Delivered)
    }
}

pub struct EditorSession<C: Clock + Clone> {
    config: ConfigContext,
    config_changes: Subscription,
    link: ServerLink,
    sync: ThrottledSync<EditorSync, C>,
    resize: ThrottledSync<f64, C>,
    timers: Scheduler<C>,
    auto_update_timer: Option<TimerHandle>,
    buffer: String,
    current_code: String,
    dirty: bool,
    console: ConsoleOutput,
    marker: Option<ErrorMarker>,
    filename: Option<String>,
    location: Option<String>,
    alerts: Vec<String>,
    view: EditorView,
}

impl<C: Clock + Clone> EditorSession<C> {
    pub fn new(
        config: ConfigContext,
        connection: Box<dyn Connection<String>>,
        clock: C,
        window_width: f64,
        view_height: f64,
    ) -> Self {
        let max_width = (window_width - WINDOW_MARGIN).max(MIN_EDITOR_WIDTH);
        let view = EditorView {
            width: Validator::clip(config.editor_width(), MIN_EDITOR_WIDTH, max_width),
            max_width,
            height: view_height,
            console_height: config.console_height(),
            hidden: config.hide_editor(),
            font_size: config.editor_font_size().max(MIN_FONT_SIZE),
        };
        let mut session = Self {
            config_changes: config.subscribe(),
            config,
            link: ServerLink::new(connection),
            sync: ThrottledSync::new(SYNC_INTERVAL_MS, clock.clone()),
            resize: ThrottledSync::new(RESIZE_THROTTLE_MS, clock.clone()),
            timers: Scheduler::new(clock),
            auto_update_timer: None,
            buffer: String::new(),
            current_code: String::new(),
            dirty: false,
            console: ConsoleOutput::default(),
            marker: None,
            filename: None,
            location: None,
            alerts: Vec::new(),
            view,
        };
        if session.config.auto_update() {
            session.start_auto_update();
        }
        session
    }

    pub fn config(&self) -> &ConfigContext {
        &self.config
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Code the server has been (or is about to be) sent.
    pub fn current_code(&self) -> &str {
        &self.current_code
    }

    /// Local edits not yet handed to the server.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn console(&self) -> &ConsoleOutput {
        &self.console
    }

    pub fn marker(&self) -> Option<&ErrorMarker> {
        self.marker.as_ref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Page location matching the open file, for history and bookmarks.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Messages to show the user, oldest first.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    pub fn sync_state(&self) -> ThrottleState {
        self.sync.state()
    }

    pub fn auto_update_active(&self) -> bool {
        self.auto_update_timer.is_some()
    }

    /// A local edit.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.dirty = self.buffer != self.current_code;
    }

    pub fn handle_text(&mut self, text: &str) -> Result<(), ProtocolError> {
        let message = ServerMessage::from_json(text)?;
        self.handle_message(message);
        Ok(())
    }

    /// Applies a server message. Execution errors become markers; nothing
    /// here is fatal to the session.
    pub fn handle_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::EditorCode { code } => {
                self.sync.reset();
                self.buffer = code.clone();
                self.current_code = code;
                self.dirty = false;
            }
            ServerMessage::EditorStdout { stdout } => {
                self.marker = None;
                self.console.stdout = stdout;
                self.console.stderr.clear();
            }
            ServerMessage::EditorFilename { filename, error } => match error {
                None => {
                    log::info!("editing {filename}");
                    self.location = Some(format!("/?filename={filename}"));
                    self.filename = Some(filename);
                }
                Some(error) => {
                    log::warn!("server refused filename {filename}: {error}");
                    self.alerts.push(error);
                }
            },
            ServerMessage::EditorError {
                error,
                short_msg,
                stdout,
            } => {
                self.marker = Some(ErrorMarker {
                    row: error.line.saturating_sub(1),
                    short_msg,
                });
                self.console.stdout = stdout;
                self.console.stderr = error.trace;
            }
        }
    }

    /// Queues the buffer for the server if it differs from what was last
    /// sent. Returns whether anything went out immediately.
    pub fn sync_with_server(&mut self) -> Result<bool, SyncError> {
        if self.buffer == self.current_code {
            return Ok(false);
        }
        // An unsent save (e.g. after a failed send) must survive newer edits.
        let save = self.sync.pending().is_some_and(|pending| pending.save);
        let payload = EditorSync {
            code: self.buffer.clone(),
            save,
        };
        self.current_code = self.buffer.clone();
        self.dirty = false;
        self.sync.schedule(payload, &mut self.link)
    }

    /// Sends the buffer with `save` set, bypassing the throttle.
    pub fn save_file(&mut self) -> Result<bool, SyncError> {
        let payload = EditorSync {
            code: self.buffer.clone(),
            save: true,
        };
        self.current_code = self.buffer.clone();
        self.dirty = false;
        let sent_now = self.sync.schedule(payload, &mut self.link)?;
        let flushed = self.sync.flush(&mut self.link)?;
        Ok(sent_now || flushed)
    }

    /// Drives timers and throttles. Every stage runs even if an earlier one
    /// fails; the first error is returned.
    pub fn poll(&mut self) -> Result<(), EditorError> {
        let mut first_error: Option<EditorError> = None;
        let fired = self.timers.poll();
        if self.auto_update_timer.is_some_and(|timer| fired.contains(&timer)) {
            if let Err(err) = self.sync_with_server() {
                first_error.get_or_insert(err.into());
            }
        }
        if let Err(err) = self.sync.poll(&mut self.link) {
            first_error.get_or_insert(err.into());
        }
        let mut resize = WindowResize {
            view: &mut self.view,
            config: &self.config,
        };
        if let Err(err) = self.resize.poll(&mut resize) {
            first_error.get_or_insert(err.into());
        }
        self.apply_config_changes();
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Coalesces browser resize events; the layout follows at most once per
    /// throttle interval.
    pub fn on_window_resize(&mut self, window_width: f64) -> Result<(), EditorError> {
        let mut resize = WindowResize {
            view: &mut self.view,
            config: &self.config,
        };
        self.resize.schedule(window_width, &mut resize)?;
        self.apply_config_changes();
        Ok(())
    }

    pub fn set_view_height(&mut self, height: f64) {
        self.view.height = height;
    }

    /// Dragging the editor's left edge by `delta_left` pixels.
    pub fn resize_editor(&mut self, delta_left: f64) -> Result<(), EditorError> {
        let width = (self.config.editor_width() - delta_left).max(0.0);
        self.config.set_editor_width(width)?;
        self.apply_config_changes();
        Ok(())
    }

    /// Dragging the console's top-left corner.
    pub fn resize_console(&mut self, delta_top: f64, delta_left: f64) -> Result<(), EditorError> {
        let max = (self.view.height - CONSOLE_HEADROOM).max(MIN_CONSOLE_HEIGHT);
        let height = Validator::clip(
            self.config.console_height() - delta_top,
            MIN_CONSOLE_HEIGHT,
            max,
        );
        self.config.set_console_height(height)?;
        self.resize_editor(delta_left)
    }

    pub fn toggle_hidden(&mut self) -> Result<(), EditorError> {
        self.config.set_hide_editor(!self.config.hide_editor())?;
        self.apply_config_changes();
        Ok(())
    }

    pub fn change_font_size(&mut self, delta: i32) -> Result<(), EditorError> {
        let size = self
            .config
            .editor_font_size()
            .saturating_add(delta)
            .max(MIN_FONT_SIZE);
        self.config.set_editor_font_size(size)?;
        self.apply_config_changes();
        Ok(())
    }

    pub fn toggle_auto_update(&mut self) -> Result<(), EditorError> {
        self.config.set_auto_update(!self.config.auto_update())?;
        self.apply_config_changes();
        Ok(())
    }

    /// Toolbar buttons and hotkeys end up here.
    pub fn apply_command(&mut self, command: EditorCommand) -> Result<(), EditorError> {
        match command {
            EditorCommand::ToggleEditor => self.toggle_hidden(),
            EditorCommand::Save => self.save_file().map(|_| ()).map_err(Into::into),
            EditorCommand::FontIncrease => self.change_font_size(1),
            EditorCommand::FontDecrease => self.change_font_size(-1),
            EditorCommand::ToggleAutoUpdate => self.toggle_auto_update(),
            EditorCommand::UpdateDisplay => {
                self.sync_with_server().map(|_| ()).map_err(Into::into)
            }
        }
    }

    /// Cancels every timer and drops unsent payloads. Nothing fires after
    /// this returns.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.auto_update_timer = None;
        self.sync.reset();
        self.resize.reset();
        log::debug!("editor session torn down");
    }

    /// Reacts to settings changed by anyone sharing the config context,
    /// this session included.
    pub fn apply_config_changes(&mut self) {
        for key in self.config_changes.drain() {
            match key {
                ConfigKey::EditorWidth => {
                    self.view.width = Validator::clip(
                        self.config.editor_width(),
                        MIN_EDITOR_WIDTH,
                        self.view.max_width,
                    );
                }
                ConfigKey::ConsoleHeight => {
                    self.view.console_height = self.config.console_height();
                }
                ConfigKey::HideEditor => self.view.hidden = self.config.hide_editor(),
                ConfigKey::EditorFontSize => {
                    self.view.font_size = self.config.editor_font_size().max(MIN_FONT_SIZE);
                }
                ConfigKey::AutoUpdate => {
                    if self.config.auto_update() {
                        self.start_auto_update();
                    } else {
                        self.stop_auto_update();
                    }
                }
            }
        }
    }

    fn start_auto_update(&mut self) {
        if self.auto_update_timer.is_none() {
            self.auto_update_timer = Some(self.timers.schedule_repeating(AUTO_UPDATE_PERIOD_MS));
        }
    }

    fn stop_auto_update(&mut self) {
        if let Some(timer) = self.auto_update_timer.take() {
            self.timers.cancel(timer);
        }
    }
}
