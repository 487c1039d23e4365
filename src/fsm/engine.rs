use log::debug;

use super::table::{PhaseSet, PhaseTable};
use super::types::{InitArgs, LoopArgs, PhaseData, PhaseResponse};

/// Drives a host `C` through the phases of `P`, one loop callback per tick.
pub struct PhaseEngine<P, C, S, const N: usize> {
    table: PhaseTable<P, C, S, N>,
    current: P,
    data: PhaseData,
    render_pending: bool,
}

impl<P: PhaseSet, C, S: Copy, const N: usize> PhaseEngine<P, C, S, N> {
    pub fn new(table: PhaseTable<P, C, S, N>, first: P) -> Self {
        if let Err(err) = table.validate() {
            panic!("fsm: phase table rejected: {err}");
        }
        Self {
            table,
            current: first,
            data: PhaseData::default(),
            render_pending: true,
        }
    }

    pub fn current(&self) -> P {
        self.current
    }

    pub fn data(&self) -> PhaseData {
        self.data
    }

    pub fn is_finished(&self) -> bool {
        self.current == P::TERMINAL
    }

    /// Runs the init callback of the first phase, if it has one.
    pub fn start(&mut self, host: &mut C) {
        self.run_init(host);
    }

    pub fn tick(&mut self, host: &mut C, response: Option<PhaseResponse<S>>) -> bool {
        if self.is_finished() {
            return false;
        }

        let Some(loop_callback) = self.table.config(self.current).loop_callback else {
            unreachable!("fsm: phase {:?} has no loop callback", self.current);
        };

        let args = LoopArgs::new(response);
        match loop_callback(host, &args) {
            Some(next) => {
                self.enter(host, next);
                !self.is_finished()
            }
            None => true,
        }
    }

    /// Phase and payload the UI has not been shown yet.
    pub fn take_render(&mut self) -> Option<(P, PhaseData)> {
        if !self.render_pending {
            return None;
        }
        self.render_pending = false;
        Some((self.current, self.data))
    }

    fn enter(&mut self, host: &mut C, next: P) {
        debug!("fsm: phase {:?} -> {:?}", self.current, next);
        self.current = next;
        self.data = PhaseData::default();
        self.run_init(host);
        self.render_pending = true;
    }

    fn run_init(&mut self, host: &mut C) {
        if let Some(init_callback) = self.table.config(self.current).init_callback {
            let mut args = InitArgs::new(&mut self.data);
            init_callback(host, &mut args);
        }
    }
}
