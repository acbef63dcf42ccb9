//! Scripted host session.
//!
//! A producer task plays the host: it reports tab layouts out of order,
//! drags the pager across pages at the animation tick rate and taps tabs.
//! The event loop owns the strip and logs every command it issues.

use std::time::Duration;

use tabstrip_core::{StripConfig, TabDescriptor};
use tabstrip_protocol::HostEvent;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::DemoConfig;
use crate::driver::Driver;
use crate::layout::{report_order, SimulatedLayout};

/// One scripted host action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Sent immediately.
    Event(HostEvent),
    /// Sent on the next animation tick.
    Frame(HostEvent),
}

/// Events flowing into the simulation loop.
#[derive(Debug)]
enum SimEvent {
    Host(HostEvent),
    Shutdown,
}

/// Counters reported after a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationStats {
    pub events: usize,
    pub commands: usize,
}

/// Build the host script: mount, measure, `swipes` page swipes, then a tap
/// on the farthest tab and a tap back on the first.
pub fn script(tabs: &[TabDescriptor], margin: f64, demo: &DemoConfig, swipes: usize) -> Vec<Step> {
    let layout = SimulatedLayout::from_tabs(tabs, margin, demo);
    let frames = (demo.swipe_ms / demo.tick_ms.max(1)).max(1) as usize;
    let mut steps = vec![Step::Event(HostEvent::SetTabs { tabs: tabs.to_vec() })];

    for page in report_order(layout.len()) {
        steps.push(Step::Event(HostEvent::TabLayout {
            page,
            rect: layout.tabs[page],
        }));
    }
    steps.push(Step::Event(HostEvent::ViewportLayout {
        rect: layout.viewport,
    }));
    steps.push(Step::Event(HostEvent::ContentSize {
        width: layout.content.width,
        height: layout.content.height,
    }));

    let last = layout.len().saturating_sub(1);
    if last == 0 {
        return steps;
    }

    // Swipe forward to the last page, then back, and so on.
    let mut page = 0usize;
    let mut forward = true;
    for _ in 0..swipes {
        if page == last {
            forward = false;
        } else if page == 0 {
            forward = true;
        }
        let target = if forward { page + 1 } else { page - 1 };

        steps.push(Step::Event(HostEvent::DragStart));
        animate(&mut steps, page, target, frames);
        steps.push(Step::Event(HostEvent::DragEnd));
        steps.push(Step::Event(HostEvent::Activate { page: target }));
        page = target;
    }

    for target in [last, 0] {
        if target == page {
            continue;
        }
        steps.push(Step::Event(HostEvent::Activate { page: target }));
        animate(&mut steps, page, target, frames);
        page = target;
    }

    steps
}

fn animate(steps: &mut Vec<Step>, from: usize, to: usize, frames: usize) {
    let (from, to) = (from as f64, to as f64);
    for frame in 1..=frames {
        let t = frame as f64 / frames as f64;
        steps.push(Step::Frame(HostEvent::Progress {
            value: from + (to - from) * t,
        }));
    }
}

/// Run `steps` through a strip, pacing frames at `tick`.
pub async fn run(steps: Vec<Step>, config: StripConfig, tick: Duration) -> SimulationStats {
    let (event_tx, mut event_rx) = mpsc::channel::<SimEvent>(100);

    let producer = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        for step in steps {
            let event = match step {
                Step::Event(event) => event,
                Step::Frame(event) => {
                    interval.tick().await;
                    event
                }
            };
            if event_tx.send(SimEvent::Host(event)).await.is_err() {
                return; // Loop gone
            }
        }
        let _ = event_tx.send(SimEvent::Shutdown).await;
    });

    let mut driver = Driver::new(config).echo_scrolls(true);
    let mut stats = SimulationStats::default();

    while let Some(event) = event_rx.recv().await {
        match event {
            SimEvent::Host(event) => {
                debug!("Host event: {:?}", event);
                stats.events += 1;
                for command in driver.handle(event) {
                    info!("{:?}", command);
                    stats.commands += 1;
                }
            }
            SimEvent::Shutdown => break,
        }
    }

    if let Err(e) = producer.await {
        tracing::warn!("Host script task failed: {}", e);
    }
    stats
}
