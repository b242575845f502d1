//! Application task
//!
//! Owns the link session and the application context. All handlers run
//! here, one event at a time.

use core::cell::RefCell;

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Ticker};

use clicklink_core::config::{AppConfig, LabelAlignment, ScreenShape, UiConfig};
use clicklink_core::{run, App, AppEvent, EventLoop, LinkSession};
use clicklink_display::TextAlignment;
use clicklink_protocol::AppUuid;

use crate::app_log::DefmtLog;
use crate::channels::{BUTTON_EVENTS, LABEL, LINK_RX};
use crate::handles::{LabelHandle, UartSink, VibeHandle};

/// Identifies this watch app to the phone
pub const WATCH_APP_UUID: AppUuid = AppUuid([
    0x3c, 0x1f, 0x5e, 0x2a, 0x8b, 0x64, 0x4d, 0x0e, 0x9a, 0x71, 0xc2, 0x05, 0xd8, 0x4b, 0x6f, 0x13,
]);

/// How often the pending push is aged
const TICK_INTERVAL_MS: u32 = 100;

type Session = RefCell<LinkSession<UartSink>>;

/// Event source fed by the button and link channels
struct FirmwareEvents<'a> {
    session: &'a Session,
    ticker: Ticker,
}

impl<'a> FirmwareEvents<'a> {
    fn new(session: &'a Session) -> Self {
        Self {
            session,
            ticker: Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64)),
        }
    }
}

impl EventLoop for FirmwareEvents<'_> {
    async fn next_event(&mut self) -> Option<AppEvent> {
        loop {
            let event = match select3(
                BUTTON_EVENTS.receive(),
                LINK_RX.receive(),
                self.ticker.next(),
            )
            .await
            {
                Either3::First(button) => Some(AppEvent::Click(button)),
                Either3::Second(Ok(frame)) => self.session.borrow_mut().on_frame(&frame),
                Either3::Second(Err(e)) => Some(self.session.borrow_mut().on_frame_error(e)),
                Either3::Third(()) => self.session.borrow_mut().tick(TICK_INTERVAL_MS),
            };

            if let Some(event) = event {
                return Some(event);
            }
        }
    }
}

/// Apply screen-shape settings to the label before anything is drawn
fn configure_label(ui: &UiConfig) {
    let alignment = match ui.alignment {
        LabelAlignment::Left => TextAlignment::Left,
        LabelAlignment::Center => TextAlignment::Center,
        LabelAlignment::Right => TextAlignment::Right,
    };
    LABEL.lock(|layer| {
        let mut layer = layer.borrow_mut();
        layer.set_alignment(alignment);
        if ui.screen == ScreenShape::Round {
            layer.enable_text_flow(ui.text_flow_inset);
        }
    });
}

#[embassy_executor::task]
pub async fn app_task(config: AppConfig) {
    info!("App task started");

    configure_label(&config.ui);

    let session: Session = RefCell::new(LinkSession::new(
        UartSink,
        WATCH_APP_UUID,
        config.app_message.ack_timeout_ms,
    ));
    session.borrow_mut().open(
        config.app_message.inbox_size as usize,
        config.app_message.outbox_size as usize,
    );
    let (inbox, outbox) = session.borrow().sizes();
    debug!("AppMessage open: inbox {} outbox {}", inbox, outbox);

    let mut app = App::new(
        LabelHandle,
        VibeHandle,
        &session,
        DefmtLog::new(config.log.level),
    );
    app.init(config.ui.initial_text.as_str());

    let mut events = FirmwareEvents::new(&session);
    run(&mut events, &mut app).await;

    warn!("App event loop ended");
}
