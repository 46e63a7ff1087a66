use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Motion axis of the vehicle.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    Surge,
    Sway,
    Heave,
    Roll,
    Pitch,
    Yaw,
}

impl Axis {
    /// The axis is angular (rad) or not. Otherwise, it is linear.
    ///
    /// # Returns
    /// True if the axis is angular. Otherwise, false.
    pub fn is_angular(&self) -> bool {
        matches!(self, Axis::Roll | Axis::Pitch | Axis::Yaw)
    }
}

/// Supported simulator. The identifier is case-insensitive and each
/// simulator has a short code and a full name.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Simulator {
    #[strum(serialize = "ac", serialize = "assetto_corsa")]
    AssettoCorsa,
    #[strum(serialize = "acc", serialize = "assetto_corsa_competizione")]
    AssettoCorsaCompetizione,
    #[strum(serialize = "rf2", serialize = "rfactor2")]
    Rfactor2,
    #[strum(serialize = "st", serialize = "simtools")]
    SimTools,
}

impl Simulator {
    /// Get the identifiers that select the simulator.
    ///
    /// # Returns
    /// Short code and full name.
    pub fn aliases(&self) -> [&'static str; 2] {
        match self {
            Simulator::AssettoCorsa => ["ac", "assetto_corsa"],
            Simulator::AssettoCorsaCompetizione => ["acc", "assetto_corsa_competizione"],
            Simulator::Rfactor2 => ["rf2", "rfactor2"],
            Simulator::SimTools => ["st", "simtools"],
        }
    }

    /// Get the display name.
    ///
    /// # Returns
    /// Display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Simulator::AssettoCorsa => "Assetto Corsa",
            Simulator::AssettoCorsaCompetizione => "Assetto Corsa Competizione",
            Simulator::Rfactor2 => "rFactor 2",
            Simulator::SimTools => "SimTools",
        }
    }
}

/// Out-of-band command to the rig firmware.
#[derive(Debug, PartialEq, Clone, Copy, EnumIter, AsRefStr)]
pub enum RigCommand {
    #[strum(serialize = "HOME")]
    Home,
    #[strum(serialize = "SELFTEST")]
    SelfTest,
}

/// State of the control loop in one iteration.
#[derive(Debug, PartialEq, Clone, Copy, AsRefStr)]
pub enum LoopState {
    Idle,
    Mapped,
    Sent,
    SendFailed,
    Stopped,
}
