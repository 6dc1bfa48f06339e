use super::{charset::candidate_pool, common::CharCell, trigger::ViewTrigger};
use crate::{
    config::ScrambleConfig,
    random::{shuffle, RandomSource},
    scheduler::{CancelToken, Scheduler},
};
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, Weak},
};
use tracing::{debug, trace};

/// A text that scrambles itself and then reveals its original characters.
///
/// The animation is driven by a [Scheduler]: once started, every tick either reveals one more
/// character (sequential mode) or re-rolls every hidden character (iteration mode) until the
/// whole text is revealed.
pub struct DecryptedText {
    session: Arc<Mutex<ScrambleSession>>,
    scheduler: Arc<dyn Scheduler>,
}

impl DecryptedText {
    pub fn new(
        text: &str,
        config: ScrambleConfig,
        scheduler: Arc<dyn Scheduler>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let session = ScrambleSession::new(text, config.normalized(), rng);
        Self { session: Arc::new(Mutex::new(session)), scheduler }
    }

    /// Start animating.
    ///
    /// This does nothing if the animation is already running or the text was destroyed.
    pub fn start(&self) {
        let mut session = self.session.lock().unwrap();
        if session.destroyed || session.is_running() {
            return;
        }
        session.revealed.clear();
        session.iteration = 0;

        let weak: Weak<Mutex<ScrambleSession>> = Arc::downgrade(&self.session);
        let token = self.scheduler.every(
            session.config.tick_interval(),
            Box::new(move || {
                if let Some(session) = weak.upgrade() {
                    session.lock().unwrap().tick();
                }
            }),
        );
        session.timer = Some(token);
        debug!(text = %session.original_text(), sequential = session.config.sequential, "scramble started");
    }

    /// Stop animating and immediately reveal the whole text.
    ///
    /// Texts that are only animated on view can't be stopped.
    pub fn stop(&self) {
        let mut session = self.session.lock().unwrap();
        if session.destroyed || !session.config.animate_on.on_hover() {
            return;
        }
        session.complete();
    }

    /// Cancel any pending animation and restore the original text for good.
    pub fn destroy(&self) {
        let mut session = self.session.lock().unwrap();
        if session.destroyed {
            return;
        }
        session.cancel_timer();
        for cell in &mut session.cells {
            cell.restore();
        }
        session.revealed.clear();
        session.destroyed = true;
        debug!(text = %session.original_text(), "scramble destroyed");
    }

    /// The pointer entered the text.
    pub fn pointer_enter(&self) {
        if self.session.lock().unwrap().config.animate_on.on_hover() {
            self.start();
        }
    }

    /// The pointer left the text.
    pub fn pointer_leave(&self) {
        self.stop();
    }

    /// Report the fraction of the text that's currently visible, between 0 and 1.
    ///
    /// The first time this crosses the configured threshold the animation starts; every later
    /// report is ignored.
    pub fn report_visibility(&self, visible_ratio: f32) {
        let fire = {
            let mut session = self.session.lock().unwrap();
            !session.destroyed && session.config.animate_on.on_view() && session.view.observe(visible_ratio)
        };
        if fire {
            debug!(visible_ratio, "view trigger fired");
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.lock().unwrap().is_running()
    }

    pub fn is_destroyed(&self) -> bool {
        self.session.lock().unwrap().destroyed
    }

    pub fn has_fired_view_trigger(&self) -> bool {
        self.session.lock().unwrap().view.has_fired()
    }

    /// The number of scramble ticks since the animation started.
    pub fn iteration_count(&self) -> u32 {
        self.session.lock().unwrap().iteration
    }

    pub fn revealed_indices(&self) -> BTreeSet<usize> {
        self.session.lock().unwrap().revealed.clone()
    }

    /// A copy of every character position as it's currently displayed.
    pub fn snapshot(&self) -> Vec<CharCell> {
        self.session.lock().unwrap().cells.clone()
    }

    /// The text as it's currently displayed.
    pub fn display_text(&self) -> String {
        self.session.lock().unwrap().cells.iter().map(|cell| cell.displayed).collect()
    }

    pub fn original_text(&self) -> String {
        self.session.lock().unwrap().original_text()
    }

    /// The characters substitutes are drawn from.
    pub fn candidate_pool(&self) -> Vec<char> {
        self.session.lock().unwrap().pool.clone()
    }

    pub fn config(&self) -> ScrambleConfig {
        self.session.lock().unwrap().config.clone()
    }
}

impl Drop for DecryptedText {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.lock() {
            session.cancel_timer();
        }
    }
}

impl std::fmt::Debug for DecryptedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedText").field("text", &self.display_text()).finish()
    }
}

struct ScrambleSession {
    cells: Vec<CharCell>,
    config: ScrambleConfig,
    pool: Vec<char>,
    revealed: BTreeSet<usize>,
    iteration: u32,
    rng: Box<dyn RandomSource>,
    timer: Option<CancelToken>,
    view: ViewTrigger,
    destroyed: bool,
}

impl ScrambleSession {
    fn new(text: &str, config: ScrambleConfig, rng: Box<dyn RandomSource>) -> Self {
        let original: Vec<char> = text.chars().collect();
        let pool = candidate_pool(&original, &config.characters, config.use_original_chars_only);
        let cells = original.iter().enumerate().map(|(index, c)| CharCell::new(index, *c)).collect();
        let view = ViewTrigger::new(config.view_threshold);
        Self {
            cells,
            config,
            pool,
            revealed: BTreeSet::new(),
            iteration: 0,
            rng,
            timer: None,
            view,
            destroyed: false,
        }
    }

    fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    fn original_text(&self) -> String {
        self.cells.iter().map(|cell| cell.original).collect()
    }

    fn tick(&mut self) {
        // A tick can still be in flight when the timer gets cancelled.
        if !self.is_running() {
            return;
        }
        let length = self.cells.len();
        if self.config.sequential {
            if let Some(index) = self.config.reveal_direction.next_index(length, &self.revealed) {
                self.revealed.insert(index);
                trace!(index, revealed = self.revealed.len(), length, "revealed character");
            }
            if self.revealed.len() >= length {
                self.complete();
            } else {
                self.scramble();
            }
        } else {
            self.scramble();
            self.iteration += 1;
            trace!(iteration = self.iteration, "scrambled text");
            if self.iteration >= self.config.max_iterations {
                self.complete();
            }
        }
    }

    /// Show a substitute for every hidden character and the original for every revealed one.
    fn scramble(&mut self) {
        let Self { cells, revealed, rng, pool, config, .. } = self;
        if config.use_original_chars_only {
            // Hand out a permutation of the hidden characters so the letter counts are kept.
            let mut hidden: Vec<char> = cells
                .iter()
                .filter(|cell| !cell.is_space() && !revealed.contains(&cell.index))
                .map(|cell| cell.original)
                .collect();
            shuffle(&mut **rng, &mut hidden);
            let mut substitutes = hidden.into_iter();
            for cell in cells.iter_mut().filter(|cell| !cell.is_space()) {
                if revealed.contains(&cell.index) {
                    cell.reveal();
                } else {
                    let substitute = substitutes.next().unwrap_or(cell.original);
                    cell.encrypt(substitute);
                }
            }
        } else {
            for cell in cells.iter_mut().filter(|cell| !cell.is_space()) {
                if revealed.contains(&cell.index) {
                    cell.reveal();
                } else if pool.is_empty() {
                    cell.encrypt(cell.original);
                } else {
                    let substitute = pool[rng.index(pool.len())];
                    cell.encrypt(substitute);
                }
            }
        }
    }

    fn complete(&mut self) {
        self.cancel_timer();
        for cell in &mut self.cells {
            cell.reveal();
        }
        self.revealed = (0..self.cells.len()).collect();
        debug!(text = %self.original_text(), "scramble complete");
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}
