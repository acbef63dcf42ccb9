//! Drives a mounted strip from protocol events.

use std::cell::RefCell;
use std::rc::Rc;

use tabstrip_core::{
    IndicatorTransform, MountedStrip, ProgressValue, RenderProps, StripConfig, StripHost,
    TabStrip,
};
use tabstrip_protocol::{HostCommand, HostEvent};
use tracing::debug;

/// Host that records every command it receives.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CommandLog(Rc<RefCell<Vec<HostCommand>>>);

impl CommandLog {
    /// Take every command recorded so far.
    pub fn drain(&self) -> Vec<HostCommand> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl StripHost for CommandLog {
    fn apply_indicator(&mut self, transform: IndicatorTransform) {
        self.0.borrow_mut().push(HostCommand::ApplyIndicator {
            translate_x: transform.translate_x,
            scale_x: transform.scale_x,
        });
    }

    fn scroll_to(&mut self, x: f64) {
        self.0.borrow_mut().push(HostCommand::ScrollTo { x });
    }
}

/// A strip mounted on a settable progress value and a [`CommandLog`].
pub struct Driver {
    source: Rc<ProgressValue>,
    mounted: MountedStrip<ProgressValue, CommandLog>,
    log: CommandLog,
    props: RenderProps,
    echo_scrolls: bool,
}

impl Driver {
    /// Mount an empty strip; tabs arrive with the first `set_tabs` event.
    pub fn new(config: StripConfig) -> Self {
        let source = Rc::new(ProgressValue::new(0.0));
        let log = CommandLog::default();
        let strip = TabStrip::new(config, 0, 0);
        let mounted = MountedStrip::mount(strip, Rc::clone(&source), log.clone());
        Self {
            source,
            mounted,
            log,
            props: RenderProps::default(),
            echo_scrolls: false,
        }
    }

    /// Report every issued scroll back to the strip, like a real scroll view.
    pub fn echo_scrolls(mut self, enabled: bool) -> Self {
        self.echo_scrolls = enabled;
        self
    }

    /// Current render props.
    pub fn props(&self) -> &RenderProps {
        &self.props
    }

    /// The mounted strip.
    pub fn mounted(&self) -> &MountedStrip<ProgressValue, CommandLog> {
        &self.mounted
    }

    /// Apply one event and return the commands it produced.
    pub fn handle(&mut self, event: HostEvent) -> Vec<HostCommand> {
        match event {
            HostEvent::SetTabs { tabs } => {
                debug!("Host set {} tabs", tabs.len());
                self.props.tabs = tabs;
                if self.props.active_tab >= self.props.tabs.len() {
                    self.props.active_tab = 0;
                }
                self.mounted.update(self.props.clone());
            }
            HostEvent::TabLayout { page, rect } => {
                self.mounted.on_tab_layout(page, rect);
            }
            HostEvent::ViewportLayout { rect } => {
                self.mounted.on_viewport_layout(rect);
            }
            HostEvent::ContentSize { width, height } => {
                self.mounted.on_content_size(width, height);
            }
            HostEvent::Progress { value } => {
                self.props.progress = value;
                self.source.set(value);
            }
            HostEvent::Scroll { offset } => {
                self.mounted.on_scroll(offset);
            }
            HostEvent::Activate { page } => {
                if page < self.props.tabs.len() {
                    self.props.active_tab = page;
                }
                self.mounted.on_active_tab_changed(page);
            }
            HostEvent::DragStart => self.mounted.begin_drag(),
            HostEvent::DragEnd => {
                self.mounted.end_drag();
            }
        }

        let commands = self.log.drain();
        if self.echo_scrolls {
            for command in &commands {
                if let HostCommand::ScrollTo { x } = *command {
                    self.mounted.on_scroll(x);
                }
            }
        }
        commands
    }
}
