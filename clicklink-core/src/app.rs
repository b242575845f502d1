//! Application context and run loop
//!
//! The host event loop delivers five kinds of notification. Instead of
//! registering callbacks into global state, the application is a value that
//! implements [`AppHandlers`] and is handed to [`run`] together with an
//! [`EventLoop`]. The loop is single-threaded: handlers never overlap.

use clicklink_protocol::{ButtonId, Dictionary};

use crate::channel::MessageChannel;
use crate::input;
use crate::traits::{AppLog, AppMessageResult, Diagnostic, Haptics, Outbox, TextDisplay};

/// Notifications delivered by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Single click on a forwarded button
    Click(ButtonId),
    /// Dictionary delivered from the phone
    InboxReceived(Dictionary),
    /// Inbound message could not be delivered
    InboxDropped(AppMessageResult),
    /// Last outbound message was not delivered
    OutboxFailed(AppMessageResult),
    /// Last outbound message was delivered
    OutboxSent,
}

/// Handler table invoked by the run loop
pub trait AppHandlers {
    fn on_click(&mut self, button: ButtonId);
    fn on_inbox_received(&mut self, dictionary: &Dictionary);
    fn on_inbox_dropped(&mut self, reason: AppMessageResult);
    fn on_outbox_failed(&mut self, reason: AppMessageResult);
    fn on_outbox_sent(&mut self);
}

/// Route one event to its handler
pub fn dispatch<H: AppHandlers + ?Sized>(handlers: &mut H, event: AppEvent) {
    match event {
        AppEvent::Click(button) => handlers.on_click(button),
        AppEvent::InboxReceived(dictionary) => handlers.on_inbox_received(&dictionary),
        AppEvent::InboxDropped(reason) => handlers.on_inbox_dropped(reason),
        AppEvent::OutboxFailed(reason) => handlers.on_outbox_failed(reason),
        AppEvent::OutboxSent => handlers.on_outbox_sent(),
    }
}

/// Source of events for the run loop
#[allow(async_fn_in_trait)]
pub trait EventLoop {
    /// Wait for the next event; `None` ends the application
    async fn next_event(&mut self) -> Option<AppEvent>;
}

/// Dispatch events until the loop ends
pub async fn run<E, H>(events: &mut E, handlers: &mut H)
where
    E: EventLoop,
    H: AppHandlers,
{
    while let Some(event) = events.next_event().await {
        dispatch(handlers, event);
    }
}

/// Owned application state
///
/// Holds the label, the vibration motor, the message channel and the log
/// sink for the lifetime of the application.
pub struct App<D, V, O, L> {
    display: D,
    haptics: V,
    channel: MessageChannel<O>,
    log: L,
}

impl<D, V, O, L> App<D, V, O, L>
where
    D: TextDisplay,
    V: Haptics,
    O: Outbox,
    L: AppLog,
{
    pub fn new(display: D, haptics: V, outbox: O, log: L) -> Self {
        Self {
            display,
            haptics,
            channel: MessageChannel::new(outbox),
            log,
        }
    }

    /// Show the start-up label
    pub fn init(&mut self, initial_text: &str) {
        self.display.set_text(initial_text);
        self.log.log(Diagnostic::Initialized);
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn haptics(&self) -> &V {
        &self.haptics
    }

    pub fn outbox(&self) -> &O {
        self.channel.outbox()
    }

    pub fn log(&self) -> &L {
        &self.log
    }
}

impl<D, V, O, L> AppHandlers for App<D, V, O, L>
where
    D: TextDisplay,
    V: Haptics,
    O: Outbox,
    L: AppLog,
{
    fn on_click(&mut self, button: ButtonId) {
        input::on_click(button, &mut self.display, &mut self.channel, &mut self.log);
    }

    fn on_inbox_received(&mut self, dictionary: &Dictionary) {
        self.channel.on_inbox_received(
            dictionary,
            &mut self.display,
            &mut self.haptics,
            &mut self.log,
        );
    }

    fn on_inbox_dropped(&mut self, reason: AppMessageResult) {
        self.channel.on_inbox_dropped(reason, &mut self.log);
    }

    fn on_outbox_failed(&mut self, reason: AppMessageResult) {
        self.channel.on_outbox_failed(reason, &mut self.log);
    }

    fn on_outbox_sent(&mut self) {
        self.channel.on_outbox_sent(&mut self.log);
    }
}
