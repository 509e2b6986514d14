//! Parameter table, pages, host value storage and the translation of
//! parameter values into generator settings.

use arrayvec::ArrayVec;

use crate::pattern_generator::{OutputMode, PatternGenerator};
use crate::resources::NUM_PARTS;
use crate::takeover::ParameterHost;

/// Routable buses, numbered from 1; 0 means unrouted.
pub const NUM_BUSES: i32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterIndex {
    Mode,
    ChaosEnable,
    ChaosAmount,
    DrumMapX,
    DrumMapY,
    Density1,
    Density2,
    Density3,
    EuclideanControlsLength,
    Length1,
    Fill1,
    Shift1,
    Length2,
    Fill2,
    Shift2,
    Length3,
    Fill3,
    Shift3,
    ClockInput,
    ResetInput,
    OutputTrig1,
    OutputTrig1Mode,
    OutputTrig2,
    OutputTrig2Mode,
    OutputTrig3,
    OutputTrig3Mode,
    OutputAccent,
    OutputAccentMode,
}

pub const NUM_PARAMETERS: usize = 28;

impl ParameterIndex {
    pub const ALL: [ParameterIndex; NUM_PARAMETERS] = [
        ParameterIndex::Mode,
        ParameterIndex::ChaosEnable,
        ParameterIndex::ChaosAmount,
        ParameterIndex::DrumMapX,
        ParameterIndex::DrumMapY,
        ParameterIndex::Density1,
        ParameterIndex::Density2,
        ParameterIndex::Density3,
        ParameterIndex::EuclideanControlsLength,
        ParameterIndex::Length1,
        ParameterIndex::Fill1,
        ParameterIndex::Shift1,
        ParameterIndex::Length2,
        ParameterIndex::Fill2,
        ParameterIndex::Shift2,
        ParameterIndex::Length3,
        ParameterIndex::Fill3,
        ParameterIndex::Shift3,
        ParameterIndex::ClockInput,
        ParameterIndex::ResetInput,
        ParameterIndex::OutputTrig1,
        ParameterIndex::OutputTrig1Mode,
        ParameterIndex::OutputTrig2,
        ParameterIndex::OutputTrig2Mode,
        ParameterIndex::OutputTrig3,
        ParameterIndex::OutputTrig3Mode,
        ParameterIndex::OutputAccent,
        ParameterIndex::OutputAccentMode,
    ];

    pub const DENSITY: [ParameterIndex; NUM_PARTS] = [
        ParameterIndex::Density1,
        ParameterIndex::Density2,
        ParameterIndex::Density3,
    ];
    pub const LENGTH: [ParameterIndex; NUM_PARTS] = [
        ParameterIndex::Length1,
        ParameterIndex::Length2,
        ParameterIndex::Length3,
    ];
    pub const FILL: [ParameterIndex; NUM_PARTS] = [
        ParameterIndex::Fill1,
        ParameterIndex::Fill2,
        ParameterIndex::Fill3,
    ];
    pub const SHIFT: [ParameterIndex; NUM_PARTS] = [
        ParameterIndex::Shift1,
        ParameterIndex::Shift2,
        ParameterIndex::Shift3,
    ];
    /// Output bus and mode parameters, in output bit order.
    pub const OUTPUTS: [(ParameterIndex, ParameterIndex); 4] = [
        (ParameterIndex::OutputTrig1, ParameterIndex::OutputTrig1Mode),
        (ParameterIndex::OutputTrig2, ParameterIndex::OutputTrig2Mode),
        (ParameterIndex::OutputTrig3, ParameterIndex::OutputTrig3Mode),
        (ParameterIndex::OutputAccent, ParameterIndex::OutputAccentMode),
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn def(self) -> &'static ParameterDef {
        &PARAMETERS[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    None,
    Enum(&'static [&'static str]),
    CvInput,
    CvOutput,
    OutputMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDef {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub default: i32,
    pub unit: Unit,
}

const MODE_NAMES: &[&str] = &["Euclidean", "Drums"];
const OFF_ON: &[&str] = &["Off", "On"];
const OUTPUT_MODE_NAMES: &[&str] = &["Add", "Replace"];

const fn plain(name: &'static str, min: i32, max: i32, default: i32) -> ParameterDef {
    ParameterDef {
        name,
        min,
        max,
        default,
        unit: Unit::None,
    }
}

const fn choice(name: &'static str, names: &'static [&'static str], default: i32) -> ParameterDef {
    ParameterDef {
        name,
        min: 0,
        max: names.len() as i32 - 1,
        default,
        unit: Unit::Enum(names),
    }
}

const fn cv_input(name: &'static str, default: i32) -> ParameterDef {
    ParameterDef {
        name,
        min: 0,
        max: NUM_BUSES,
        default,
        unit: Unit::CvInput,
    }
}

const fn cv_output(name: &'static str, default: i32) -> ParameterDef {
    ParameterDef {
        name,
        min: 0,
        max: NUM_BUSES,
        default,
        unit: Unit::CvOutput,
    }
}

const fn output_mode(name: &'static str) -> ParameterDef {
    ParameterDef {
        name,
        min: 0,
        max: 1,
        default: 0,
        unit: Unit::OutputMode,
    }
}

/// Definitions in [`ParameterIndex`] order.
pub static PARAMETERS: [ParameterDef; NUM_PARAMETERS] = [
    choice("Mode", MODE_NAMES, 1),
    choice("Chaos", OFF_ON, 0),
    plain("Chaos Amount", 0, 255, 0),
    plain("Map X", 0, 255, 0),
    plain("Map Y", 0, 255, 0),
    plain("Density 1", 0, 255, 128),
    plain("Density 2", 0, 255, 128),
    plain("Density 3", 0, 255, 128),
    choice("Euclid Controls Length", OFF_ON, 0),
    plain("Length 1", 1, 32, 16),
    plain("Fill 1", 0, 255, 128),
    plain("Shift 1", 0, 31, 0),
    plain("Length 2", 1, 32, 16),
    plain("Fill 2", 0, 255, 128),
    plain("Shift 2", 0, 31, 0),
    plain("Length 3", 1, 32, 16),
    plain("Fill 3", 0, 255, 128),
    plain("Shift 3", 0, 31, 0),
    cv_input("Clock In", 0),
    cv_input("Reset In", 0),
    cv_output("Trig 1 Out", 13),
    output_mode("Trig 1 Out mode"),
    cv_output("Trig 2 Out", 14),
    output_mode("Trig 2 Out mode"),
    cv_output("Trig 3 Out", 15),
    output_mode("Trig 3 Out mode"),
    cv_output("Accent Out", 16),
    output_mode("Accent Out mode"),
];

pub struct ParameterPage {
    pub name: &'static str,
    pub params: &'static [ParameterIndex],
}

pub static PAGES: [ParameterPage; 4] = [
    ParameterPage {
        name: "Main",
        params: &[
            ParameterIndex::Mode,
            ParameterIndex::ChaosEnable,
            ParameterIndex::ChaosAmount,
        ],
    },
    ParameterPage {
        name: "Drums",
        params: &[
            ParameterIndex::DrumMapX,
            ParameterIndex::DrumMapY,
            ParameterIndex::ChaosAmount,
            ParameterIndex::Density1,
            ParameterIndex::Density2,
            ParameterIndex::Density3,
        ],
    },
    ParameterPage {
        name: "Euclidean",
        params: &[
            ParameterIndex::EuclideanControlsLength,
            ParameterIndex::Length1,
            ParameterIndex::Fill1,
            ParameterIndex::Shift1,
            ParameterIndex::Length2,
            ParameterIndex::Fill2,
            ParameterIndex::Shift2,
            ParameterIndex::Length3,
            ParameterIndex::Fill3,
            ParameterIndex::Shift3,
        ],
    },
    ParameterPage {
        name: "Routing",
        params: &[
            ParameterIndex::ClockInput,
            ParameterIndex::ResetInput,
            ParameterIndex::OutputTrig1,
            ParameterIndex::OutputTrig1Mode,
            ParameterIndex::OutputTrig2,
            ParameterIndex::OutputTrig2Mode,
            ParameterIndex::OutputTrig3,
            ParameterIndex::OutputTrig3Mode,
            ParameterIndex::OutputAccent,
            ParameterIndex::OutputAccentMode,
        ],
    },
];

/// Look a parameter up by its display name, ignoring case.
pub fn find_by_name(name: &str) -> Option<ParameterIndex> {
    ParameterIndex::ALL
        .iter()
        .copied()
        .find(|p| p.def().name.eq_ignore_ascii_case(name))
}

/// Current value of every parameter, as the host would store them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValues {
    values: ArrayVec<i32, NUM_PARAMETERS>,
}

impl Default for ParameterValues {
    fn default() -> Self {
        Self {
            values: PARAMETERS.iter().map(|def| def.default).collect(),
        }
    }
}

impl ParameterValues {
    pub fn get(&self, index: ParameterIndex) -> i32 {
        self.values[index.index()]
    }

    /// Store a value clamped to the parameter's range; returns what was stored.
    pub fn set(&mut self, index: ParameterIndex, value: i32) -> i32 {
        let def = index.def();
        let value = value.clamp(def.min, def.max);
        self.values[index.index()] = value;
        value
    }

    /// Raw-index variant for hosts that address parameters by number.
    /// Unknown indices are ignored.
    pub fn set_raw(&mut self, index: usize, value: i32) -> Option<i32> {
        ParameterIndex::from_index(index).map(|p| self.set(p, value))
    }

    pub fn mode(&self) -> OutputMode {
        OutputMode::from_value(self.get(ParameterIndex::Mode))
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }
}

impl ParameterHost for ParameterValues {
    fn value(&self, index: ParameterIndex) -> i32 {
        self.get(index)
    }

    fn range(&self, index: ParameterIndex) -> Option<(i32, i32)> {
        let def = index.def();
        Some((def.min, def.max))
    }

    fn set_from_ui(&mut self, index: ParameterIndex, value: i32) {
        self.set(index, value);
    }
}

fn as_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Push parameter values into the generator.
///
/// Drum coordinates and densities are only written in drum mode and the
/// Euclidean channel settings only in Euclidean mode, so each mode keeps
/// its own settings while the other is active.
pub fn apply_to_generator(values: &ParameterValues, generator: &mut PatternGenerator) {
    let mode = values.mode();
    generator.set_output_mode(mode);

    match mode {
        OutputMode::Drums => {
            generator.set_map_position(
                as_u8(values.get(ParameterIndex::DrumMapX)),
                as_u8(values.get(ParameterIndex::DrumMapY)),
            );
            for (channel, &param) in ParameterIndex::DENSITY.iter().enumerate() {
                generator.set_density(channel, as_u8(values.get(param)));
            }
        }
        OutputMode::Euclidean => {
            for channel in 0..NUM_PARTS {
                generator.set_length(channel, as_u8(values.get(ParameterIndex::LENGTH[channel])));
                generator.set_fill(channel, as_u8(values.get(ParameterIndex::FILL[channel])));
                generator.set_shift(channel, as_u8(values.get(ParameterIndex::SHIFT[channel])));
            }
        }
    }

    let chaos = values.get(ParameterIndex::ChaosEnable) != 0;
    generator.set_global_chaos(chaos);
    let amount = if chaos {
        as_u8(values.get(ParameterIndex::ChaosAmount))
    } else {
        0
    };
    generator.set_randomness(amount);
    generator.set_chaos_amount(amount);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern_generator::ModeSettings;

    #[test]
    fn table_matches_index_order() {
        assert_eq!(ParameterIndex::ALL.len(), PARAMETERS.len());
        for (i, p) in ParameterIndex::ALL.iter().enumerate() {
            assert_eq!(p.index(), i, "{p:?} out of order");
        }
        assert_eq!(ParameterIndex::Mode.def().name, "Mode");
        assert_eq!(ParameterIndex::OutputAccentMode.def().name, "Accent Out mode");
    }

    #[test]
    fn defaults_are_in_range() {
        for def in &PARAMETERS {
            assert!(
                def.min <= def.default && def.default <= def.max,
                "{} default {} outside {}..={}",
                def.name,
                def.default,
                def.min,
                def.max
            );
        }
    }

    #[test]
    fn every_parameter_is_on_a_page() {
        for p in ParameterIndex::ALL {
            assert!(
                PAGES.iter().any(|page| page.params.contains(&p)),
                "{p:?} is on no page"
            );
        }
    }

    #[test]
    fn set_clamps() {
        let mut values = ParameterValues::default();
        assert_eq!(values.set(ParameterIndex::Length2, 0), 1);
        assert_eq!(values.set(ParameterIndex::Length2, 64), 32);
        assert_eq!(values.set(ParameterIndex::ChaosAmount, -4), 0);
        assert_eq!(values.set_raw(99, 3), None);
        assert_eq!(values.set_raw(0, 0), Some(0));
        assert_eq!(values.mode(), OutputMode::Euclidean);
    }

    #[test]
    fn find_by_name_ignores_case() {
        assert_eq!(find_by_name("map x"), Some(ParameterIndex::DrumMapX));
        assert_eq!(find_by_name("Fill 3"), Some(ParameterIndex::Fill3));
        assert_eq!(find_by_name("Swing"), None);
    }

    #[test]
    fn drum_values_reach_the_generator() {
        let mut values = ParameterValues::default();
        values.set(ParameterIndex::DrumMapX, 10);
        values.set(ParameterIndex::DrumMapY, 20);
        values.set(ParameterIndex::Density2, 30);
        let mut generator = PatternGenerator::new();
        apply_to_generator(&values, &mut generator);

        let drums = generator.settings(OutputMode::Drums);
        match drums.options {
            ModeSettings::Drums(d) => assert_eq!((d.x, d.y), (10, 20)),
            other => panic!("drum slot holds {other:?}"),
        }
        assert_eq!(drums.density, [128, 30, 128]);
        assert_eq!(
            generator.settings(OutputMode::Euclidean).density,
            [128; 3],
            "Euclidean fills untouched in drum mode"
        );
    }

    #[test]
    fn euclidean_values_reach_the_generator() {
        let mut values = ParameterValues::default();
        values.set(ParameterIndex::Mode, 0);
        values.set(ParameterIndex::Length3, 7);
        values.set(ParameterIndex::Fill1, 255);
        values.set(ParameterIndex::Shift2, 5);
        let mut generator = PatternGenerator::new();
        apply_to_generator(&values, &mut generator);

        assert_eq!(generator.output_mode(), OutputMode::Euclidean);
        assert_eq!(generator.euclidean_length(2), 7);
        assert_eq!(generator.fill(0), 16);
        assert_eq!(generator.euclidean_shift(1), 5);
    }

    #[test]
    fn chaos_amount_only_applies_when_enabled() {
        let mut values = ParameterValues::default();
        values.set(ParameterIndex::ChaosAmount, 150);
        let mut generator = PatternGenerator::new();
        apply_to_generator(&values, &mut generator);
        assert!(!generator.chaos_enabled());
        assert!(matches!(
            generator.settings(OutputMode::Drums).options,
            ModeSettings::Drums(d) if d.randomness == 0
        ));

        values.set(ParameterIndex::ChaosEnable, 1);
        apply_to_generator(&values, &mut generator);
        assert!(generator.chaos_enabled());
        assert!(matches!(
            generator.settings(OutputMode::Drums).options,
            ModeSettings::Drums(d) if d.randomness == 150
        ));
        assert!(matches!(
            generator.settings(OutputMode::Euclidean).options,
            ModeSettings::Euclidean(e) if e.chaos_amount == 150
        ));
    }
}
