use core::fmt;

use super::types::{InitArgs, LoopArgs};

pub trait PhaseSet: Copy + Eq + fmt::Debug {
    const COUNT: usize;
    const TERMINAL: Self;

    fn index(self) -> usize;
}

pub type InitCallback<C> = fn(&mut C, &mut InitArgs<'_>);
pub type LoopCallback<P, C, S> = fn(&mut C, &LoopArgs<S>) -> Option<P>;

pub struct PhaseConfig<P, C, S> {
    pub init_callback: Option<InitCallback<C>>,
    pub loop_callback: Option<LoopCallback<P, C, S>>,
}

impl<P, C, S> PhaseConfig<P, C, S> {
    pub const fn terminal() -> Self {
        Self {
            init_callback: None,
            loop_callback: None,
        }
    }

    pub const fn looping(loop_callback: LoopCallback<P, C, S>) -> Self {
        Self {
            init_callback: None,
            loop_callback: Some(loop_callback),
        }
    }

    pub const fn with_init(mut self, init_callback: InitCallback<C>) -> Self {
        self.init_callback = Some(init_callback);
        self
    }
}

impl<P, C, S> Clone for PhaseConfig<P, C, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C, S> Copy for PhaseConfig<P, C, S> {}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PhaseTableError<P> {
    SizeMismatch { expected: usize, actual: usize },
    OutOfOrder { position: usize, phase: P },
    MissingLoopCallback(P),
    TerminalHasCallbacks(P),
}

impl<P: fmt::Debug> fmt::Display for PhaseTableError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "table has {actual} entries, phase set has {expected}")
            }
            Self::OutOfOrder { position, phase } => {
                write!(f, "phase {phase:?} listed at position {position}")
            }
            Self::MissingLoopCallback(phase) => write!(f, "phase {phase:?} has no loop callback"),
            Self::TerminalHasCallbacks(phase) => {
                write!(f, "terminal phase {phase:?} must not have callbacks")
            }
        }
    }
}

/// Callback table indexed by `PhaseSet::index`. Entries must be listed in
/// index order so lookups stay a plain array access.
pub struct PhaseTable<P, C, S, const N: usize> {
    entries: [(P, PhaseConfig<P, C, S>); N],
}

impl<P: PhaseSet, C, S, const N: usize> PhaseTable<P, C, S, N> {
    pub const fn new(entries: [(P, PhaseConfig<P, C, S>); N]) -> Self {
        Self { entries }
    }

    pub fn validate(&self) -> Result<(), PhaseTableError<P>> {
        if N != P::COUNT {
            return Err(PhaseTableError::SizeMismatch {
                expected: P::COUNT,
                actual: N,
            });
        }

        for (position, (phase, config)) in self.entries.iter().enumerate() {
            if phase.index() != position {
                return Err(PhaseTableError::OutOfOrder {
                    position,
                    phase: *phase,
                });
            }

            if *phase == P::TERMINAL {
                if config.init_callback.is_some() || config.loop_callback.is_some() {
                    return Err(PhaseTableError::TerminalHasCallbacks(*phase));
                }
            } else if config.loop_callback.is_none() {
                return Err(PhaseTableError::MissingLoopCallback(*phase));
            }
        }

        Ok(())
    }

    pub(crate) fn config(&self, phase: P) -> PhaseConfig<P, C, S> {
        self.entries[phase.index()].1
    }
}
