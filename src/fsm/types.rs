use crate::config::PHASE_DATA_LEN;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Response {
    Yes,
    No,
    Back,
    Cancel,
    Ok,
    Retry,
    Help,
    Abort,
    Finish,
    Continue,
}

/// A single user intent delivered to the current phase. `S` is the
/// phase-specific vocabulary a wizard may add next to the generic one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PhaseResponse<S> {
    Generic(Response),
    Specific(S),
}

impl<S> From<Response> for PhaseResponse<S> {
    fn from(value: Response) -> Self {
        Self::Generic(value)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PhaseData([u8; PHASE_DATA_LEN]);

impl PhaseData {
    pub const fn new(bytes: [u8; PHASE_DATA_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn from_byte(value: u8) -> Self {
        let mut bytes = [0u8; PHASE_DATA_LEN];
        bytes[0] = value;
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; PHASE_DATA_LEN] {
        &self.0
    }
}

pub struct LoopArgs<S> {
    pub(crate) response: Option<PhaseResponse<S>>,
}

impl<S: Copy> LoopArgs<S> {
    pub const fn new(response: Option<PhaseResponse<S>>) -> Self {
        Self { response }
    }

    pub fn response(&self) -> Option<Response> {
        match self.response {
            Some(PhaseResponse::Generic(response)) => Some(response),
            _ => None,
        }
    }

    pub fn specific(&self) -> Option<S> {
        match self.response {
            Some(PhaseResponse::Specific(response)) => Some(response),
            _ => None,
        }
    }
}

pub struct InitArgs<'e> {
    data: &'e mut PhaseData,
}

impl<'e> InitArgs<'e> {
    pub(crate) fn new(data: &'e mut PhaseData) -> Self {
        Self { data }
    }

    pub fn change_data(&mut self, data: PhaseData) {
        *self.data = data;
    }
}
