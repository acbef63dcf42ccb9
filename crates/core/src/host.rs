//! Seams to the host UI framework.
//!
//! The engine needs exactly two capabilities from the host (place the
//! indicator, scroll the strip) and one input stream (page progress). Hosts
//! deliver every callback serially on their UI thread, so everything here is
//! single-threaded and `Rc`-based.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::evaluator::IndicatorTransform;
use crate::geometry::Rect;
use crate::render::{RenderProps, StripFrame};
use crate::strip::{Effects, TabStrip};

/// Opaque capabilities of the host's indicator and scroll views.
pub trait StripHost {
    /// Set the indicator's transform.
    fn apply_indicator(&mut self, transform: IndicatorTransform);

    /// Scroll the strip to `x` immediately, without animation.
    fn scroll_to(&mut self, x: f64);
}

/// Handle returned by [`ProgressSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A continuously varying page-progress value.
pub trait ProgressSource {
    /// Register a listener called with every new value.
    fn subscribe(&self, listener: Box<dyn FnMut(f64)>) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// Sample the current value.
    fn value(&self) -> f64;
}

/// A listener registration released on drop.
pub struct Subscription<S: ProgressSource + ?Sized> {
    source: Rc<S>,
    id: ListenerId,
}

impl<S: ProgressSource + ?Sized> Subscription<S> {
    /// Subscribe `listener` to `source` for the lifetime of the guard.
    pub fn new(source: Rc<S>, listener: Box<dyn FnMut(f64)>) -> Self {
        let id = source.subscribe(listener);
        Self { source, id }
    }

    /// Id of the underlying listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<S: ProgressSource + ?Sized> Drop for Subscription<S> {
    fn drop(&mut self) {
        if self.source.unsubscribe(self.id) {
            debug!("Released progress listener {:?}", self.id);
        }
    }
}

type Listener = Rc<RefCell<Box<dyn FnMut(f64)>>>;

#[derive(Default)]
struct ProgressInner {
    value: f64,
    next_id: u64,
    listeners: BTreeMap<ListenerId, Listener>,
}

/// Reference [`ProgressSource`]: a settable value notifying its listeners.
#[derive(Default)]
pub struct ProgressValue {
    inner: RefCell<ProgressInner>,
}

impl ProgressValue {
    /// Create a source starting at `value`.
    pub fn new(value: f64) -> Self {
        Self {
            inner: RefCell::new(ProgressInner {
                value,
                ..Default::default()
            }),
        }
    }

    /// Update the value and notify every listener.
    ///
    /// A listener that sets the value again from inside its own callback is
    /// not re-entered.
    pub fn set(&self, value: f64) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.listeners.values().cloned().collect()
        };

        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut callback) => callback(value),
                Err(_) => trace!("Skipping re-entrant progress listener"),
            }
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl ProgressSource for ProgressValue {
    fn subscribe(&self, listener: Box<dyn FnMut(f64)>) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.insert(id, Rc::new(RefCell::new(listener)));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(&id).is_some()
    }

    fn value(&self) -> f64 {
        self.inner.borrow().value
    }
}

/// A [`TabStrip`] wired to a progress source and a host.
///
/// Mounting subscribes to the source; dropping the value (normally or while
/// unwinding) unsubscribes. The listener holds only weak references, so a
/// sample can never reach a torn-down strip.
pub struct MountedStrip<S: ProgressSource + 'static, H: StripHost + 'static> {
    strip: Rc<RefCell<TabStrip>>,
    host: Rc<RefCell<H>>,
    source: Rc<S>,
    subscription: Subscription<S>,
}

impl<S: ProgressSource + 'static, H: StripHost + 'static> MountedStrip<S, H> {
    /// Mount `strip`, subscribing it to `source` and routing effects to `host`.
    pub fn mount(strip: TabStrip, source: Rc<S>, host: H) -> Self {
        let strip = Rc::new(RefCell::new(strip));
        let host = Rc::new(RefCell::new(host));

        let weak_strip: Weak<RefCell<TabStrip>> = Rc::downgrade(&strip);
        let weak_host: Weak<RefCell<H>> = Rc::downgrade(&host);
        let listener = Box::new(move |value: f64| {
            let (Some(strip), Some(host)) = (weak_strip.upgrade(), weak_host.upgrade()) else {
                return;
            };
            let Ok(mut strip) = strip.try_borrow_mut() else {
                trace!("Strip busy, dropping progress sample {}", value);
                return;
            };
            let effects = strip.on_progress(value);
            drop(strip);
            match host.try_borrow_mut() {
                Ok(mut host) => effects.apply(&mut *host),
                Err(_) => trace!("Host busy, dropping effects for progress {}", value),
            };
        });

        let subscription = Subscription::new(Rc::clone(&source), listener);
        debug!("Mounted tab strip (listener {:?})", subscription.id());

        Self {
            strip,
            host,
            source,
            subscription,
        }
    }

    fn dispatch(&self, event: impl FnOnce(&mut TabStrip, f64) -> Effects) -> Effects {
        let progress = self.source.value();
        let effects = event(&mut self.strip.borrow_mut(), progress);
        effects.apply(&mut *self.host.borrow_mut());
        effects
    }

    /// Forward a tab layout report.
    pub fn on_tab_layout(&self, page: usize, rect: Rect) -> Effects {
        self.dispatch(|strip, progress| strip.on_tab_layout(page, rect, progress))
    }

    /// Forward a viewport layout report.
    pub fn on_viewport_layout(&self, rect: Rect) -> Effects {
        self.dispatch(|strip, progress| strip.on_viewport_layout(rect, progress))
    }

    /// Forward a content size change.
    pub fn on_content_size(&self, width: f64, height: f64) -> Effects {
        self.dispatch(|strip, progress| strip.on_content_size(width, height, progress))
    }

    /// Forward a strip scroll report.
    pub fn on_scroll(&self, offset: f64) {
        self.strip.borrow_mut().on_scroll(offset);
    }

    /// Forward a discrete activation.
    pub fn on_active_tab_changed(&self, index: usize) -> Effects {
        self.dispatch(|strip, _| strip.on_active_tab_changed(index))
    }

    /// Forward the start of a pager drag.
    pub fn begin_drag(&self) {
        self.strip.borrow_mut().begin_drag();
    }

    /// Forward the end of a pager drag.
    pub fn end_drag(&self) -> Effects {
        self.dispatch(|strip, _| strip.end_drag())
    }

    /// Feed new render props; returns whether the host should redraw.
    pub fn update(&self, props: RenderProps) -> bool {
        let mut redraw = false;
        self.dispatch(|strip, _| {
            let outcome = strip.update(props);
            redraw = outcome.redraw;
            outcome.effects
        });
        redraw
    }

    /// Describe the strip for `props`.
    pub fn render(&self, props: &RenderProps) -> StripFrame {
        self.strip.borrow().render(props)
    }

    /// Read access to the strip state.
    pub fn with_strip<R>(&self, f: impl FnOnce(&TabStrip) -> R) -> R {
        f(&self.strip.borrow())
    }

    /// Read access to the host.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.host.borrow())
    }

    /// Listener id held by this mount.
    pub fn listener(&self) -> ListenerId {
        self.subscription.id()
    }

    /// Unmount, releasing the progress subscription.
    pub fn unmount(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_value_notifies_listeners() {
        let source = ProgressValue::new(0.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        source.subscribe(Box::new(move |v| sink.borrow_mut().push(v)));

        source.set(0.5);
        source.set(1.0);

        assert_eq!(*seen.borrow(), vec![0.5, 1.0]);
        assert_eq!(source.value(), 1.0);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let source = ProgressValue::new(0.0);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = source.subscribe(Box::new(move |_| *sink.borrow_mut() += 1));

        source.set(1.0);
        assert!(source.unsubscribe(id));
        assert!(!source.unsubscribe(id));
        source.set(2.0);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_subscription_released_on_drop() {
        let source = Rc::new(ProgressValue::new(0.0));
        {
            let _guard = Subscription::new(Rc::clone(&source), Box::new(|_| {}));
            assert_eq!(source.listener_count(), 1);
        }
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_subscription_released_on_unwind() {
        let source = Rc::new(ProgressValue::new(0.0));
        let inner = Rc::clone(&source);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = Subscription::new(inner, Box::new(|_| {}));
            panic!("host crashed mid-frame");
        }));

        assert!(result.is_err());
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_reentrant_set_is_not_reentered() {
        let source = Rc::new(ProgressValue::new(0.0));
        let calls = Rc::new(RefCell::new(0));
        let (inner, sink) = (Rc::clone(&source), Rc::clone(&calls));
        source.subscribe(Box::new(move |v| {
            *sink.borrow_mut() += 1;
            if v < 1.0 {
                inner.set(v + 1.0);
            }
        }));

        source.set(0.5);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(source.value(), 1.5);
    }
}
