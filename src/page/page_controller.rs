//! Page controller implementation
//!
//! This module implements the controller that owns every view controller on
//! the page and routes environment events and timers to them.

use crate::carousel::CarouselController;
use crate::config::PageConfig;
use crate::counter::CounterAnimator;
use crate::error::FolioError;
use crate::layout::DocumentLayout;
use crate::nav::{Navigation, ScrollRequest};
use crate::reveal::{IntersectionRegistry, RevealGroup, RevealTransition};
use crate::scroll::ScrollTracker;
use crate::timer::{FiredTimer, TimerQueue};
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Entity id of the testimonial carousel for `PageEvent::UnmountEntity`
pub const CAROUSEL_ENTITY: &str = "testimonials";

/// Longest the event loop waits without checking the timer queue
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Owner tag of a page timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerOwner {
    /// Stat counter at this index
    Counter(usize),
    /// Testimonial carousel
    Carousel,
    /// Reveal group at this index
    Reveal(usize),
}

/// Environment events delivered by the page shell
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Page geometry changed (mount, resize, content load)
    Layout(DocumentLayout),
    /// Scroll offset changed
    Scroll {
        /// Vertical scroll offset in pixels
        scroll_y: f64,
    },
    /// Intersection ratio computed by the shell for one entity
    Intersection {
        /// Reveal entity id
        entity: String,
        /// Visible fraction, 0.0 to 1.0
        ratio: f64,
    },
    /// Navigation item clicked
    NavigateTo(String),
    /// Mobile menu button clicked
    ToggleMobileMenu,
    /// Mobile menu overlay clicked
    CloseMobileMenu,
    /// Carousel dot or thumbnail clicked
    SelectTestimonial(usize),
    /// One entity removed from the page
    UnmountEntity(String),
    /// Whole page removed
    UnmountAll,
    /// Unmount and stop the event loop
    Shutdown,
}

/// Render state of a reveal group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealView {
    /// Entity id
    pub id: String,
    /// Parent visible
    pub visible: bool,
    /// Children that have entered
    pub visible_children: usize,
    /// Total children
    pub children: usize,
}

/// Render state of a stat counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterView {
    /// Stat id
    pub id: String,
    /// Counted value
    pub value: u32,
    /// Target value
    pub target: u32,
    /// Value with prefix and suffix
    pub display: String,
}

/// Page state snapshot for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Virtual time of the snapshot
    pub at: Duration,
    /// Floating navigation shown
    pub nav_visible: bool,
    /// Highlighted navigation entry
    pub active_section: Option<String>,
    /// Mobile menu open
    pub mobile_menu_open: bool,
    /// Reveal groups in configuration order
    pub reveals: Vec<RevealView>,
    /// Counters in configuration order
    pub counters: Vec<CounterView>,
    /// Testimonial on display
    pub carousel_index: Option<usize>,
    /// Scroll the shell should perform
    pub scroll_request: Option<ScrollRequest>,
}

impl PageState {
    /// Reveal group by id
    pub fn reveal(&self, id: &str) -> Option<&RevealView> {
        self.reveals.iter().find(|r| r.id == id)
    }

    /// Counter by id
    pub fn counter(&self, id: &str) -> Option<&CounterView> {
        self.counters.iter().find(|c| c.id == id)
    }
}

/// Owner of every view controller on the page
#[derive(Debug)]
pub struct PageController {
    timers: TimerQueue<TimerOwner>,
    observers: IntersectionRegistry,
    scroll: ScrollTracker,
    navigation: Navigation,
    reveals: Vec<RevealGroup>,
    counters: Vec<CounterAnimator>,
    carousel: CarouselController,
    counter_trigger: String,
    layout: DocumentLayout,
    scroll_y: f64,
    mounted: bool,
    pending_scroll: Option<ScrollRequest>,
    /// Event receiver from the page shell (taken when the event loop starts)
    event_receiver: Option<mpsc::Receiver<PageEvent>>,
    /// State sender to the renderer
    state_sender: mpsc::SyncSender<PageState>,
}

impl PageController {
    /// Mount the page: register observers and arm the carousel
    pub fn new(
        config: PageConfig,
        event_receiver: mpsc::Receiver<PageEvent>,
        state_sender: mpsc::SyncSender<PageState>,
    ) -> Self {
        let config = config.sanitized();
        let mut timers = TimerQueue::new();
        let mut observers = IntersectionRegistry::new();

        let scroll = ScrollTracker::new(&config.sections, &config.timing);
        let reveals: Vec<RevealGroup> = config
            .reveals
            .iter()
            .map(|reveal| RevealGroup::mount(reveal, &mut observers))
            .collect();
        if !reveals.iter().any(|g| g.id() == config.counter_trigger) {
            warn!(
                "Counter trigger: {}; counters will not run",
                FolioError::MissingElement(config.counter_trigger.clone())
            );
        }

        let counters: Vec<CounterAnimator> = config
            .stats
            .iter()
            .enumerate()
            .map(|(index, stat)| CounterAnimator::new(stat, index, &config.timing))
            .collect();

        let mut carousel = CarouselController::new(
            config.testimonials,
            Duration::from_millis(config.timing.carousel_interval_ms),
        );
        carousel.mount(&mut timers.scoped(TimerOwner::Carousel));

        info!(
            "Page mounted: {} sections, {} reveal entities, {} counters, {} testimonials",
            scroll.sections().len(),
            reveals.len(),
            counters.len(),
            carousel.len()
        );

        Self {
            timers,
            observers,
            scroll,
            navigation: Navigation::new(config.nav_items, &config.timing),
            reveals,
            counters,
            carousel,
            counter_trigger: config.counter_trigger,
            layout: DocumentLayout::default(),
            scroll_y: 0.0,
            mounted: true,
            pending_scroll: None,
            event_receiver: Some(event_receiver),
            state_sender,
        }
    }

    /// Hand the event receiver to the event loop. Only the first call gets it.
    fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<PageEvent>> {
        self.event_receiver.take()
    }

    /// Whether the page is still mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Number of pending timers held by `owner`
    pub fn live_timers(&self, owner: TimerOwner) -> usize {
        self.timers.live_count(owner)
    }

    /// Number of pending timers on the page
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of entities still observed for intersection
    pub fn observed_entities(&self) -> usize {
        self.observers.len()
    }

    /// Time from `now` until the next timer is due
    pub fn time_until_next_timer(&self, now: Duration) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    /// Handle one page event. Returns `false` once the page has shut down.
    pub fn handle_event(&mut self, event: PageEvent) -> bool {
        if event == PageEvent::Shutdown {
            info!("Shutdown requested");
            self.unmount_all();
            return false;
        }

        if !self.mounted {
            debug!("Page unmounted; ignoring {:?}", event);
            return true;
        }

        let changed = match event {
            PageEvent::Layout(layout) => {
                debug!(
                    "Layout updated: {} sections, {} entities",
                    layout.sections.len(),
                    layout.entities.len()
                );
                self.layout = layout;
                self.apply_scroll(self.scroll_y)
            }
            PageEvent::Scroll { scroll_y } => self.apply_scroll(scroll_y),
            PageEvent::Intersection { entity, ratio } => {
                match self.reveals.iter().position(|g| g.id() == entity) {
                    Some(index) => self.deliver_intersection(index, ratio),
                    None => {
                        debug!("Intersection ignored: {}", FolioError::MissingElement(entity));
                        false
                    }
                }
            }
            PageEvent::NavigateTo(id) => {
                let menu_was_open = self.navigation.is_mobile_menu_open();
                match self.navigation.scroll_to_section(&id, &self.layout) {
                    Ok(request) => {
                        self.pending_scroll = Some(request);
                        true
                    }
                    Err(e) => {
                        debug!("Navigation ignored: {}", e);
                        menu_was_open
                    }
                }
            }
            PageEvent::ToggleMobileMenu => {
                self.navigation.toggle_mobile_menu();
                true
            }
            PageEvent::CloseMobileMenu => self.navigation.close_mobile_menu(),
            PageEvent::SelectTestimonial(index) => {
                match self
                    .carousel
                    .select(index, &mut self.timers.scoped(TimerOwner::Carousel))
                {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("Carousel selection rejected: {}", e);
                        false
                    }
                }
            }
            PageEvent::UnmountEntity(id) => {
                self.unmount_entity(&id);
                false
            }
            PageEvent::UnmountAll => {
                self.unmount_all();
                false
            }
            PageEvent::Shutdown => false,
        };

        if changed {
            self.send_state_update();
        }
        true
    }

    /// Fire every timer due at or before `now`, in deadline order.
    /// Returns the number of timers fired.
    pub fn advance_clock(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        let mut changed = false;

        while let Some(timer) = self.timers.pop_due(now) {
            fired += 1;
            changed |= self.dispatch_timer(timer);
        }
        self.timers.settle(now);

        if changed {
            self.send_state_update();
        }
        fired
    }

    fn dispatch_timer(&mut self, timer: FiredTimer<TimerOwner>) -> bool {
        match timer.owner {
            TimerOwner::Counter(index) => match self.counters.get_mut(index) {
                Some(counter) => counter
                    .on_timer(timer.id, &mut self.timers.scoped(timer.owner))
                    .is_some(),
                None => false,
            },
            TimerOwner::Carousel => self.carousel.on_timer(timer.id).is_some(),
            TimerOwner::Reveal(index) => self
                .reveals
                .get_mut(index)
                .is_some_and(|group| group.on_timer(timer.id)),
        }
    }

    fn apply_scroll(&mut self, scroll_y: f64) -> bool {
        self.scroll_y = scroll_y;
        let update = self
            .scroll
            .on_scroll(scroll_y, &self.layout.at_scroll(scroll_y));

        let ratios: SmallVec<[(usize, f64); 8]> = self
            .reveals
            .iter()
            .enumerate()
            .filter_map(|(index, group)| {
                self.layout
                    .entity_ratio(group.id(), scroll_y)
                    .map(|ratio| (index, ratio))
            })
            .collect();

        let mut changed = update.is_changed();
        for (index, ratio) in ratios {
            changed |= self.deliver_intersection(index, ratio);
        }
        changed
    }

    fn deliver_intersection(&mut self, index: usize, ratio: f64) -> bool {
        let Some(group) = self.reveals.get_mut(index) else {
            return false;
        };
        if !self.observers.is_observed(group.id()) {
            return false;
        }

        let is_trigger = group.id() == self.counter_trigger;
        let transition = group.on_intersection(
            ratio,
            &mut self.observers,
            &mut self.timers.scoped(TimerOwner::Reveal(index)),
        );

        if transition == Some(RevealTransition::Revealed) && is_trigger {
            self.start_counters();
        }
        transition.is_some()
    }

    fn start_counters(&mut self) {
        info!("Stats revealed, starting {} counters", self.counters.len());
        for (index, counter) in self.counters.iter_mut().enumerate() {
            counter.on_reveal(&mut self.timers.scoped(TimerOwner::Counter(index)));
        }
    }

    /// Tear down one entity: a reveal group, a counter, or the carousel.
    /// Returns `false` if no entity has that id.
    pub fn unmount_entity(&mut self, id: &str) -> bool {
        if let Some(index) = self.reveals.iter().position(|g| g.id() == id) {
            self.reveals[index].unmount(
                &mut self.observers,
                &mut self.timers.scoped(TimerOwner::Reveal(index)),
            );
        } else if let Some(index) = self.counters.iter().position(|c| c.id() == id) {
            self.counters[index].unmount(&mut self.timers.scoped(TimerOwner::Counter(index)));
        } else if id == CAROUSEL_ENTITY {
            self.carousel
                .unmount(&mut self.timers.scoped(TimerOwner::Carousel));
        } else {
            debug!("Unmount ignored: {}", FolioError::MissingElement(id.to_string()));
            return false;
        }

        info!("Unmounted '{}'", id);
        true
    }

    /// Tear down every controller, releasing all timers and observers
    pub fn unmount_all(&mut self) {
        if !self.mounted {
            return;
        }

        for (index, group) in self.reveals.iter_mut().enumerate() {
            group.unmount(
                &mut self.observers,
                &mut self.timers.scoped(TimerOwner::Reveal(index)),
            );
        }
        for (index, counter) in self.counters.iter_mut().enumerate() {
            counter.unmount(&mut self.timers.scoped(TimerOwner::Counter(index)));
        }
        self.carousel
            .unmount(&mut self.timers.scoped(TimerOwner::Carousel));

        self.mounted = false;
        self.pending_scroll = None;
        info!(
            "Page unmounted ({} timers, {} observers remaining)",
            self.timers.len(),
            self.observers.len()
        );
    }

    /// Current render state
    pub fn snapshot(&self) -> PageState {
        PageState {
            at: self.timers.now(),
            nav_visible: self.scroll.nav_visible(),
            active_section: self.scroll.active_section().map(str::to_string),
            mobile_menu_open: self.navigation.is_mobile_menu_open(),
            reveals: self
                .reveals
                .iter()
                .map(|group| RevealView {
                    id: group.id().to_string(),
                    visible: group.is_visible(),
                    visible_children: group.visible_children(),
                    children: group.child_count(),
                })
                .collect(),
            counters: self
                .counters
                .iter()
                .map(|counter| CounterView {
                    id: counter.id().to_string(),
                    value: counter.value(),
                    target: counter.target(),
                    display: counter.display(),
                })
                .collect(),
            carousel_index: self.carousel.current_index(),
            scroll_request: self.pending_scroll.clone(),
        }
    }

    /// Send the current state to the renderer. A pending scroll request is
    /// kept until a snapshot carrying it is accepted.
    fn send_state_update(&mut self) {
        match self.state_sender.try_send(self.snapshot()) {
            Ok(()) => {
                self.pending_scroll = None;
                debug!("State update sent to renderer");
            }
            Err(mpsc::TrySendError::Full(_)) => {
                warn!("Renderer is behind; dropping state update");
            }
            Err(mpsc::TrySendError::Disconnected(_)) => {
                self.pending_scroll = None;
                debug!("Renderer disconnected; state update dropped");
            }
        }
    }

    /// Send the mount-time state so the renderer can draw the first frame
    pub fn send_initial_state(&mut self) {
        info!("Sending initial page state");
        self.send_state_update();
    }

    /// Spawn the event loop in a background thread.
    ///
    /// Events and timers are handled one at a time under the controller
    /// lock; wall-clock time since the loop started drives the timer queue.
    /// Returns `None` if the loop was already started.
    pub fn spawn_event_loop(
        controller: Arc<Mutex<PageController>>,
    ) -> Option<std::thread::JoinHandle<()>> {
        use std::sync::mpsc::RecvTimeoutError;

        let Some(event_receiver) = controller.lock().take_event_receiver() else {
            warn!("Page event loop already running; spawn ignored");
            return None;
        };

        Some(std::thread::spawn(move || {
            info!("Entering page event loop");
            let started = Instant::now();

            loop {
                let wait = controller
                    .lock()
                    .time_until_next_timer(started.elapsed())
                    .map_or(IDLE_POLL, |until| until.min(IDLE_POLL));

                match event_receiver.recv_timeout(wait) {
                    Ok(event) => {
                        let mut guard = controller.lock();
                        // Timers that came due while waiting run before the event.
                        guard.advance_clock(started.elapsed());
                        if !guard.handle_event(event) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        warn!("Page event channel disconnected. Exiting event loop.");
                        controller.lock().unmount_all();
                        break;
                    }
                }

                controller.lock().advance_clock(started.elapsed());
            }

            info!("Page event loop exited");
        }))
    }
}
