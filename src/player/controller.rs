// ==========================================
// PLAYBACK CONTROLLER
// ==========================================
// Glue between the library, the resolver and the player surfaces.
//
// Responsibilities:
// - remember the selected item, tab, search query and playback mode
// - keep the right surface alive for the current item
//   * youtube item  -> YouTube surface (created on demand, reused across items)
//   * file/hls item -> native surface (YouTube surface destroyed)
// - when a surface reports Ended/Failed, ask the resolver what comes next
//
// The resolver only sees the items currently visible (tab + search), so
// auto-next walks the list the user is looking at.

use tracing::{info, warn};

use crate::player::surface::{PlayerSurface, SurfaceEvent, SurfaceKind};
use crate::playlist::library::{self, Library, Tab};
use crate::playlist::resolver::{resolve, Continuation, ContinuationMode, PlaybackMode};
use crate::playlist::PlaylistItem;

pub type SurfaceFactory = Box<dyn Fn() -> Box<dyn PlayerSurface>>;

/// What happened after the current item finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// Same item started again (repeat one)
    Restarted(String),
    /// Switched to this item
    Advanced(String),
    Stopped,
}

/// Reported back to the UI from tick()
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Ended(EndOutcome),
    Failed { id: String, error: String, outcome: EndOutcome },
}

pub struct PlaybackController {
    library: Library,
    tab: Tab,
    query: String,
    current_id: Option<String>,
    mode: PlaybackMode,
    native: Box<dyn PlayerSurface>,
    youtube: Option<Box<dyn PlayerSurface>>,
    make_youtube: SurfaceFactory,
    // Id of the item loaded on the active surface
    loaded: Option<String>,
    // Load errors are reported through tick() like any other failure
    deferred_failure: Option<String>,
}

impl PlaybackController {
    pub fn new(native: Box<dyn PlayerSurface>, make_youtube: SurfaceFactory, mode: PlaybackMode) -> Self {
        PlaybackController {
            library: Library::default(),
            tab: Tab::default(),
            query: String::new(),
            current_id: None,
            mode,
            native,
            youtube: None,
            make_youtube,
            loaded: None,
            deferred_failure: None,
        }
    }

    // ------------------------------------------
    // Queries
    // ------------------------------------------

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn visible(&self) -> Vec<PlaylistItem> {
        self.library.visible(self.tab, &self.query)
    }

    /// Selected item, or the first visible one when the selection isn't visible
    pub fn current(&self) -> Option<PlaylistItem> {
        let visible = self.visible();
        library::current(&visible, self.current_id.as_deref()).cloned()
    }

    pub fn active_kind(&self) -> Option<SurfaceKind> {
        if let Some(surface) = self.youtube.as_deref() {
            Some(surface.kind())
        } else if self.loaded.is_some() {
            Some(self.native.kind())
        } else {
            None
        }
    }

    // ------------------------------------------
    // User actions
    // ------------------------------------------

    pub fn set_playlist(&mut self, items: Vec<PlaylistItem>) {
        self.library.replace(items);
        self.sync_surface();
    }

    pub fn select(&mut self, id: &str) {
        self.current_id = Some(id.to_string());
        self.sync_surface();
    }

    /// The selection survives a tab switch; current() falls back to the first visible item
    pub fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.sync_surface();
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.sync_surface();
    }

    /// Turning repeat on turns auto-next off
    pub fn toggle_repeat(&mut self) -> PlaybackMode {
        self.mode.repeat_one = !self.mode.repeat_one;
        if self.mode.repeat_one {
            self.mode.auto_next = false;
        }
        self.mode
    }

    /// Turning auto-next on turns repeat off
    pub fn toggle_auto_next(&mut self) -> PlaybackMode {
        self.mode.auto_next = !self.mode.auto_next;
        if self.mode.auto_next {
            self.mode.repeat_one = false;
        }
        self.mode
    }

    /// Selecting the current item afterwards plays it again
    pub fn stop(&mut self) {
        self.native.stop();
        if let Some(surface) = self.youtube.as_deref_mut() {
            surface.stop();
        }
        self.loaded = None;
    }

    // ==========================================
    // tick()
    // ==========================================
    // Called from the UI loop. Polls the active surface and turns Ended /
    // Failed into a resolver call.
    pub fn tick(&mut self) -> Option<ControllerEvent> {
        if let Some(error) = self.deferred_failure.take() {
            return Some(self.fail_current(error));
        }

        let event = match self.active_surface() {
            Some(surface) => surface.poll(),
            None => return None,
        };

        match event {
            SurfaceEvent::Ended => Some(ControllerEvent::Ended(self.on_ended())),
            SurfaceEvent::Failed(error) => Some(self.fail_current(error)),
            SurfaceEvent::Idle | SurfaceEvent::Loading | SurfaceEvent::Playing => None,
        }
    }

    // ==========================================
    // on_ended()
    // ==========================================
    // 1. Ask the resolver with the visible list, the current item's id and
    //    the continuation mode derived from the two flags.
    // 2. RepeatCurrent -> restart the active surface in place
    //    AdvanceTo(id)  -> select id (same id means restart)
    //    Stop           -> leave the finished item where it is
    pub fn on_ended(&mut self) -> EndOutcome {
        self.continue_with(ContinuationMode::from(self.mode))
    }

    // A broken item is never repeated: repeat-one falls back to advancing,
    // otherwise failures follow the normal rules.
    fn on_failed(&mut self) -> EndOutcome {
        let mode = match ContinuationMode::from(self.mode) {
            ContinuationMode::Repeat => ContinuationMode::Advance,
            other => other,
        };
        self.continue_with(mode)
    }

    fn fail_current(&mut self, error: String) -> ControllerEvent {
        let id = self.current().map(|item| item.id).unwrap_or_default();
        warn!(id = %id, error = %error, "Playback failed, moving on");
        // The failed item is no longer loaded on anything
        self.loaded = None;
        let outcome = self.on_failed();
        ControllerEvent::Failed { id, error, outcome }
    }

    fn continue_with(&mut self, mode: ContinuationMode) -> EndOutcome {
        let visible = self.visible();
        let current = library::current(&visible, self.current_id.as_deref());
        let current_id = current.map(|item| item.id.as_str());

        let next = match resolve(&visible, current_id, mode) {
            Continuation::Stop => None,
            Continuation::RepeatCurrent(id) => Some((id.to_string(), true)),
            Continuation::AdvanceTo(id) => Some((id.to_string(), Some(id) == current_id)),
        };

        match next {
            None => {
                info!(current = ?current_id, "Playback finished");
                // Nothing is playing any more, re-selecting must load again
                self.loaded = None;
                EndOutcome::Stopped
            }
            Some((id, true)) => {
                info!(id = %id, "Repeating");
                self.restart_current(&id);
                EndOutcome::Restarted(id)
            }
            Some((id, false)) => {
                info!(from = ?current_id, to = %id, "Advancing");
                self.select(&id);
                EndOutcome::Advanced(id)
            }
        }
    }

    fn restart_current(&mut self, id: &str) {
        if self.loaded.as_deref() != Some(id) {
            // Nothing to restart in place (e.g. it failed), load it fresh
            self.current_id = Some(id.to_string());
            self.sync_surface();
            return;
        }
        let result = match self.active_surface() {
            Some(surface) => surface.restart(),
            None => return,
        };
        if let Err(e) = result {
            self.deferred_failure = Some(e.to_string());
        }
    }

    fn active_surface(&mut self) -> Option<&mut (dyn PlayerSurface + 'static)> {
        if let Some(surface) = self.youtube.as_deref_mut() {
            return Some(surface);
        }
        if self.loaded.is_some() {
            return Some(self.native.as_mut());
        }
        None
    }

    // ==========================================
    // sync_surface()
    // ==========================================
    // Makes the surfaces match current():
    // - no current item      -> stop everything, drop the YouTube surface
    // - already loaded       -> nothing to do
    // - youtube item         -> stop native, create YouTube surface if
    //                           needed, load the video on it
    // - file/hls item        -> drop the YouTube surface, load on native
    fn sync_surface(&mut self) {
        let item = match self.current() {
            Some(item) => item,
            None => {
                self.native.stop();
                self.destroy_youtube();
                self.loaded = None;
                return;
            }
        };

        if self.loaded.as_deref() == Some(item.id.as_str()) {
            return;
        }

        let result = if item.is_youtube() {
            self.native.stop();
            let make_youtube = &self.make_youtube;
            let surface = self.youtube.get_or_insert_with(|| make_youtube());
            surface.load(&item)
        } else {
            self.destroy_youtube();
            self.native.load(&item)
        };

        self.loaded = Some(item.id.clone());
        if let Err(e) = result {
            self.deferred_failure = Some(e.to_string());
        }
    }

    fn destroy_youtube(&mut self) {
        if let Some(mut surface) = self.youtube.take() {
            surface.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::playlist::MediaKind;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;
    type Script = Rc<RefCell<VecDeque<SurfaceEvent>>>;

    // Records every call and replays scripted poll events
    struct FakeSurface {
        kind: SurfaceKind,
        log: Log,
        script: Script,
        fail_loads: bool,
        fail_restarts: bool,
    }

    impl PlayerSurface for FakeSurface {
        fn kind(&self) -> SurfaceKind {
            self.kind
        }

        fn load(&mut self, item: &PlaylistItem) -> Result<()> {
            self.log.borrow_mut().push(format!("{:?}:load:{}", self.kind, item.id));
            if self.fail_loads {
                return Err(Error::Player("boom".into()));
            }
            Ok(())
        }

        fn restart(&mut self) -> Result<()> {
            self.log.borrow_mut().push(format!("{:?}:restart", self.kind));
            if self.fail_restarts {
                return Err(Error::Player("restart failed".into()));
            }
            Ok(())
        }

        fn stop(&mut self) {
            self.log.borrow_mut().push(format!("{:?}:stop", self.kind));
        }

        fn poll(&mut self) -> SurfaceEvent {
            self.script.borrow_mut().pop_front().unwrap_or(SurfaceEvent::Playing)
        }
    }

    struct Harness {
        controller: PlaybackController,
        log: Log,
        native_script: Script,
        youtube_script: Script,
        youtube_created: Rc<RefCell<usize>>,
    }

    fn harness(mode: PlaybackMode) -> Harness {
        harness_with(mode, false)
    }

    fn harness_with(mode: PlaybackMode, fail_loads: bool) -> Harness {
        harness_failing(mode, fail_loads, false)
    }

    fn harness_failing(mode: PlaybackMode, fail_loads: bool, fail_restarts: bool) -> Harness {
        let log: Log = Rc::default();
        let native_script: Script = Rc::default();
        let youtube_script: Script = Rc::default();
        let youtube_created = Rc::new(RefCell::new(0));

        let native = Box::new(FakeSurface {
            kind: SurfaceKind::Native,
            log: log.clone(),
            script: native_script.clone(),
            fail_loads,
            fail_restarts,
        });

        let factory_log = log.clone();
        let factory_script = youtube_script.clone();
        let factory_count = youtube_created.clone();
        let make_youtube: SurfaceFactory = Box::new(move || -> Box<dyn PlayerSurface> {
            *factory_count.borrow_mut() += 1;
            Box::new(FakeSurface {
                kind: SurfaceKind::YouTube,
                log: factory_log.clone(),
                script: factory_script.clone(),
                fail_loads: false,
                fail_restarts,
            })
        });

        let mut controller = PlaybackController::new(native, make_youtube, mode);
        controller.set_playlist(playlist());
        Harness {
            controller,
            log,
            native_script,
            youtube_script,
            youtube_created,
        }
    }

    fn file(id: &str) -> PlaylistItem {
        PlaylistItem {
            id: id.into(),
            title: format!("video {}", id),
            kind: MediaKind::File { url: format!("https://x/{}.mp4", id) },
            tags: Vec::new(),
            thumb: None,
        }
    }

    fn youtube(id: &str) -> PlaylistItem {
        PlaylistItem {
            id: id.into(),
            title: format!("yt {}", id),
            kind: MediaKind::YouTube { youtube_id: format!("yt-{}", id) },
            tags: Vec::new(),
            thumb: None,
        }
    }

    fn playlist() -> Vec<PlaylistItem> {
        vec![file("a"), youtube("y1"), file("b"), youtube("y2"), file("c")]
    }

    fn take_log(h: &Harness) -> Vec<String> {
        std::mem::take(&mut *h.log.borrow_mut())
    }

    #[test]
    fn loading_playlist_starts_first_visible_item() {
        let h = harness(PlaybackMode::new(false, true));
        assert_eq!(h.controller.current().map(|i| i.id), Some("a".to_string()));
        assert_eq!(take_log(&h), vec!["Native:load:a"]);
        assert_eq!(h.controller.active_kind(), Some(SurfaceKind::Native));
    }

    #[test]
    fn ended_advances_through_visible_items_and_stops_at_last() {
        let mut h = harness(PlaybackMode::new(false, true));
        take_log(&h);

        h.native_script.borrow_mut().push_back(SurfaceEvent::Ended);
        assert_eq!(
            h.controller.tick(),
            Some(ControllerEvent::Ended(EndOutcome::Advanced("b".into())))
        );
        assert_eq!(take_log(&h), vec!["Native:load:b"]);

        h.controller.select("c");
        take_log(&h);
        h.native_script.borrow_mut().push_back(SurfaceEvent::Ended);
        assert_eq!(h.controller.tick(), Some(ControllerEvent::Ended(EndOutcome::Stopped)));
        assert!(take_log(&h).is_empty());
    }

    #[test]
    fn repeat_restarts_native_in_place() {
        let mut h = harness(PlaybackMode::new(true, false));
        take_log(&h);
        h.native_script.borrow_mut().push_back(SurfaceEvent::Ended);
        assert_eq!(
            h.controller.tick(),
            Some(ControllerEvent::Ended(EndOutcome::Restarted("a".into())))
        );
        assert_eq!(take_log(&h), vec!["Native:restart"]);
    }

    #[test]
    fn neither_mode_stops() {
        let mut h = harness(PlaybackMode::new(false, false));
        assert_eq!(h.controller.on_ended(), EndOutcome::Stopped);
    }

    #[test]
    fn youtube_surface_lives_only_on_youtube_tab() {
        let mut h = harness(PlaybackMode::new(false, true));
        take_log(&h);

        h.controller.switch_tab(Tab::YouTube);
        assert_eq!(take_log(&h), vec!["Native:stop", "YouTube:load:y1"]);
        assert_eq!(*h.youtube_created.borrow(), 1);
        assert_eq!(h.controller.active_kind(), Some(SurfaceKind::YouTube));

        // Item change inside the tab reuses the surface
        h.youtube_script.borrow_mut().push_back(SurfaceEvent::Ended);
        assert_eq!(
            h.controller.tick(),
            Some(ControllerEvent::Ended(EndOutcome::Advanced("y2".into())))
        );
        assert_eq!(take_log(&h), vec!["Native:stop", "YouTube:load:y2"]);
        assert_eq!(*h.youtube_created.borrow(), 1);

        // Leaving the tab destroys it
        h.controller.switch_tab(Tab::Video);
        assert_eq!(take_log(&h), vec!["YouTube:stop", "Native:load:a"]);
        assert_eq!(h.controller.active_kind(), Some(SurfaceKind::Native));

        h.controller.switch_tab(Tab::YouTube);
        assert_eq!(*h.youtube_created.borrow(), 2);
    }

    #[test]
    fn switching_tabs_keeps_the_selection() {
        let mut h = harness(PlaybackMode::new(false, true));
        h.controller.select("b");
        h.controller.switch_tab(Tab::YouTube);
        h.controller.switch_tab(Tab::Video);
        assert_eq!(h.controller.current().map(|i| i.id), Some("b".to_string()));
    }

    #[test]
    fn search_narrows_what_auto_next_walks() {
        let mut h = harness(PlaybackMode::new(false, true));
        h.controller.set_query("video c");
        assert_eq!(h.controller.current().map(|i| i.id), Some("c".to_string()));
        assert_eq!(h.controller.on_ended(), EndOutcome::Stopped);
    }

    #[test]
    fn failure_falls_back_to_next_even_with_repeat() {
        let mut h = harness(PlaybackMode::new(true, false));
        take_log(&h);
        h.native_script
            .borrow_mut()
            .push_back(SurfaceEvent::Failed("decode error".into()));
        assert_eq!(
            h.controller.tick(),
            Some(ControllerEvent::Failed {
                id: "a".into(),
                error: "decode error".into(),
                outcome: EndOutcome::Advanced("b".into()),
            })
        );
    }

    #[test]
    fn load_errors_surface_through_tick() {
        let mut h = harness_with(PlaybackMode::new(false, false), true);
        match h.controller.tick() {
            Some(ControllerEvent::Failed { id, outcome, .. }) => {
                assert_eq!(id, "a");
                assert_eq!(outcome, EndOutcome::Stopped);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(h.controller.tick(), None);
    }

    #[test]
    fn toggles_are_mutually_exclusive() {
        let mut h = harness(PlaybackMode::new(false, true));
        assert_eq!(h.controller.toggle_repeat(), PlaybackMode::new(true, false));
        assert_eq!(h.controller.toggle_auto_next(), PlaybackMode::new(false, true));
        assert_eq!(h.controller.toggle_auto_next(), PlaybackMode::new(false, false));
        assert_eq!(h.controller.toggle_repeat(), PlaybackMode::new(true, false));
        assert_eq!(h.controller.toggle_repeat(), PlaybackMode::new(false, false));
    }

    #[test]
    fn empty_playlist_has_no_active_surface() {
        let mut h = harness(PlaybackMode::new(true, true));
        h.controller.set_playlist(Vec::new());
        assert_eq!(h.controller.current(), None);
        assert_eq!(h.controller.active_kind(), None);
        assert_eq!(h.controller.tick(), None);
        assert_eq!(h.controller.on_ended(), EndOutcome::Stopped);
    }

    #[test]
    fn stopped_item_plays_again_when_reselected() {
        let mut h = harness(PlaybackMode::new(false, false));
        take_log(&h);
        h.native_script.borrow_mut().push_back(SurfaceEvent::Ended);
        assert_eq!(h.controller.tick(), Some(ControllerEvent::Ended(EndOutcome::Stopped)));
        assert_eq!(h.controller.active_kind(), None);

        h.controller.select("a");
        assert_eq!(take_log(&h), vec!["Native:load:a"]);
        assert_eq!(h.controller.active_kind(), Some(SurfaceKind::Native));
    }

    #[test]
    fn manual_stop_then_reselect_reloads() {
        let mut h = harness(PlaybackMode::new(false, true));
        take_log(&h);
        h.controller.stop();
        assert_eq!(take_log(&h), vec!["Native:stop"]);

        h.controller.select("a");
        assert_eq!(take_log(&h), vec!["Native:load:a"]);
    }

    #[test]
    fn repeat_restarts_youtube_surface_in_place() {
        let mut h = harness(PlaybackMode::new(true, false));
        h.controller.switch_tab(Tab::YouTube);
        take_log(&h);

        h.youtube_script.borrow_mut().push_back(SurfaceEvent::Ended);
        assert_eq!(
            h.controller.tick(),
            Some(ControllerEvent::Ended(EndOutcome::Restarted("y1".into())))
        );
        assert_eq!(take_log(&h), vec!["YouTube:restart"]);
        assert_eq!(*h.youtube_created.borrow(), 1);
    }

    #[test]
    fn restart_error_is_reported_on_next_tick() {
        let mut h = harness_failing(PlaybackMode::new(true, false), false, true);
        take_log(&h);

        h.native_script.borrow_mut().push_back(SurfaceEvent::Ended);
        assert_eq!(
            h.controller.tick(),
            Some(ControllerEvent::Ended(EndOutcome::Restarted("a".into())))
        );
        assert_eq!(take_log(&h), vec!["Native:restart"]);

        // Failures never repeat, so the broken item gives way to the next one
        assert_eq!(
            h.controller.tick(),
            Some(ControllerEvent::Failed {
                id: "a".into(),
                error: "Player error: restart failed".into(),
                outcome: EndOutcome::Advanced("b".into()),
            })
        );
        assert_eq!(take_log(&h), vec!["Native:load:b"]);
    }
}
