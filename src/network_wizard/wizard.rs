use log::info;

use crate::fsm::{PhaseData, PhaseEngine};

use super::machine::WizardMachine;
use super::ports::Platform;
use super::types::{NetworkSetupResponse, Phase, WifiCredentials, WizardMode, WizardResponse};

type WizardEngine<P> =
    PhaseEngine<Phase, WizardMachine<P>, NetworkSetupResponse, { Phase::COUNT }>;

/// One network setup run over a `Platform`. The mode is fixed by the
/// constructor and every run starts from `Phase::Init`.
pub struct NetworkSetupWizard<P: Platform> {
    machine: WizardMachine<P>,
    engine: WizardEngine<P>,
}

impl<P: Platform> NetworkSetupWizard<P> {
    pub fn new(platform: P) -> Self {
        Self::with_machine(WizardMachine::new(platform, WizardMode::FromNetworkMenu))
    }

    pub fn initial_setup(platform: P) -> Self {
        Self::with_machine(WizardMachine::new(platform, WizardMode::InitialSetup))
    }

    pub fn ini_load_only(platform: P) -> Self {
        Self::with_machine(WizardMachine::new(platform, WizardMode::IniLoadOnly))
    }

    /// Starts straight at the confirmation screen for credentials scanned
    /// outside the wizard.
    pub fn nfc_only(platform: P, credentials: WifiCredentials) -> Self {
        Self::with_machine(
            WizardMachine::new(platform, WizardMode::NfcOnly).with_nfc_credentials(credentials),
        )
    }

    fn with_machine(machine: WizardMachine<P>) -> Self {
        Self {
            machine,
            engine: PhaseEngine::new(WizardMachine::phase_table(), Phase::Init),
        }
    }

    pub fn mode(&self) -> WizardMode {
        self.machine.mode()
    }

    pub fn phase(&self) -> Phase {
        self.engine.current()
    }

    pub fn phase_data(&self) -> PhaseData {
        self.engine.data()
    }

    pub fn nfc_credentials(&self) -> &WifiCredentials {
        self.machine.nfc_credentials()
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    pub fn platform(&self) -> &P {
        &self.machine.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.machine.platform
    }

    pub fn into_platform(self) -> P {
        self.machine.platform
    }

    /// Advances by at most one phase. Returns `false` once `Finish` is reached.
    pub fn tick(&mut self, response: Option<WizardResponse>) -> bool {
        let running = self.engine.tick(&mut self.machine, response);
        self.publish();
        running
    }

    /// Blocks until the wizard reaches `Finish`, pulling responses from the UI.
    pub fn run(&mut self) {
        info!("netwizard: start mode={:?}", self.machine.mode());
        self.engine.start(&mut self.machine);
        self.publish();

        loop {
            let response = self.machine.platform.ui().take_response();
            let running = self.tick(response);
            self.machine.platform.idle();
            if !running {
                break;
            }
        }

        info!("netwizard: finished mode={:?}", self.machine.mode());
    }

    fn publish(&mut self) {
        if let Some((phase, data)) = self.engine.take_render() {
            self.machine.platform.ui().show_phase(phase, data);
        }
    }
}
