//! Element catalog: the closed set of optical primitives and their metadata.
//!
//! Everything here is static reference data. Lookups never fail: every
//! [`OperationKind`] has a complete entry.

use std::f64::consts::FRAC_PI_4;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IrError;
use crate::operation::Parameters;

/// Target simulation framework for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Strawberry Fields (Gaussian / continuous-variable style API).
    StrawberryFields,
    /// Perceval (discrete linear-optics style API).
    Perceval,
}

impl Framework {
    /// Both frameworks, in display order.
    pub const ALL: [Framework; 2] = [Framework::StrawberryFields, Framework::Perceval];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            Framework::StrawberryFields => "strawberryfields",
            Framework::Perceval => "perceval",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Framework::StrawberryFields => "Strawberry Fields",
            Framework::Perceval => "Perceval",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Framework {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strawberryfields" | "strawberry_fields" | "sf" => Ok(Framework::StrawberryFields),
            "perceval" | "pcvl" => Ok(Framework::Perceval),
            other => Err(IrError::UnknownFramework(other.to_string())),
        }
    }
}

/// How many modes an operation binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// Acts on the mode it is placed on.
    SingleMode,
    /// Acts on the mode it is placed on and its right neighbour.
    DualMode,
}

/// One reference section of an element's documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocSection {
    /// Section heading.
    pub title: &'static str,
    /// Prose body.
    pub content: &'static str,
    /// Optional formula or API signature.
    pub formula: Option<&'static str>,
}

const fn section(
    title: &'static str,
    content: &'static str,
    formula: Option<&'static str>,
) -> DocSection {
    DocSection {
        title,
        content,
        formula,
    }
}

/// Optical primitives that can be placed on a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Coherent-state source.
    Laser,
    /// Two-mode beam splitter.
    BeamSplitter,
    /// Phase rotation.
    PhaseShifter,
    /// Single-mode squeezing.
    SqueezeGate,
    /// Phase-space displacement.
    DisplacementGate,
    /// Kerr nonlinearity.
    KerrGate,
    /// Photon-number measurement.
    Measure,
    /// Half-wave plate.
    HalfWavePlate,
    /// Quarter-wave plate.
    QuarterWavePlate,
    /// Mode permutation.
    Permutation,
    /// Polarizing beam splitter.
    PolarizingBeamSplitter,
    /// Temporal delay line.
    TimeDelay,
    /// Arbitrary unitary.
    Unitary,
}

impl OperationKind {
    /// Every kind, in palette order.
    pub const ALL: [OperationKind; 13] = [
        OperationKind::Laser,
        OperationKind::BeamSplitter,
        OperationKind::PhaseShifter,
        OperationKind::SqueezeGate,
        OperationKind::DisplacementGate,
        OperationKind::KerrGate,
        OperationKind::Measure,
        OperationKind::HalfWavePlate,
        OperationKind::QuarterWavePlate,
        OperationKind::Permutation,
        OperationKind::PolarizingBeamSplitter,
        OperationKind::TimeDelay,
        OperationKind::Unitary,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Laser => "Laser",
            OperationKind::BeamSplitter => "Beam Splitter",
            OperationKind::PhaseShifter => "Phase Shifter",
            OperationKind::SqueezeGate => "Squeezing Gate",
            OperationKind::DisplacementGate => "Displacement Gate",
            OperationKind::KerrGate => "Kerr Gate",
            OperationKind::Measure => "Photonic Measurement",
            OperationKind::HalfWavePlate => "Half Wave Plate",
            OperationKind::QuarterWavePlate => "Quarter Wave Plate",
            OperationKind::Permutation => "Permutation",
            OperationKind::PolarizingBeamSplitter => "Polarizing Beam Splitter",
            OperationKind::TimeDelay => "Time Delay",
            OperationKind::Unitary => "Unitary",
        }
    }

    /// Short glyph used by diagram renderers.
    pub fn symbol(self) -> &'static str {
        match self {
            OperationKind::Laser => "💡",
            OperationKind::BeamSplitter => "🔀",
            OperationKind::PhaseShifter => "𝜙",
            OperationKind::SqueezeGate => "⇉",
            OperationKind::DisplacementGate => "↗",
            OperationKind::KerrGate => "🌀",
            OperationKind::Measure => "🔍",
            OperationKind::HalfWavePlate => "½λ",
            OperationKind::QuarterWavePlate => "¼λ",
            OperationKind::Permutation => "⇄",
            OperationKind::PolarizingBeamSplitter => "⊠",
            OperationKind::TimeDelay => "⏱",
            OperationKind::Unitary => "U",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            OperationKind::Laser => "Creates a coherent state (laser input)",
            OperationKind::BeamSplitter => "Splits or combines optical paths",
            OperationKind::PhaseShifter => "Applies a phase shift to a mode",
            OperationKind::SqueezeGate => "Applies squeezing operation",
            OperationKind::DisplacementGate => "Displaces a state in phase space",
            OperationKind::KerrGate => "Applies Kerr nonlinearity",
            OperationKind::Measure => "Measures photonic states",
            OperationKind::HalfWavePlate => "Rotates polarization by twice the plate angle",
            OperationKind::QuarterWavePlate => "Converts between linear and circular polarization",
            OperationKind::Permutation => "Swaps a mode with its right neighbour",
            OperationKind::PolarizingBeamSplitter => {
                "Transmits one polarization and reflects the orthogonal one"
            }
            OperationKind::TimeDelay => "Delays photons travelling in a mode",
            OperationKind::Unitary => "Applies an arbitrary unitary to two adjacent modes",
        }
    }

    /// Declared parameters with their defaults, in display order.
    pub fn parameter_defaults(self) -> &'static [(&'static str, f64)] {
        match self {
            OperationKind::PhaseShifter => &[("phi", 0.5)],
            OperationKind::SqueezeGate => &[("r", 0.5), ("theta", 0.0)],
            OperationKind::DisplacementGate => &[("r", 0.5), ("phi", 0.0)],
            OperationKind::KerrGate => &[("kappa", 0.1)],
            OperationKind::BeamSplitter => &[("theta", 0.5), ("phi", FRAC_PI_4)],
            OperationKind::HalfWavePlate | OperationKind::QuarterWavePlate => &[("theta", 0.0)],
            OperationKind::TimeDelay => &[("delay", 1.0)],
            OperationKind::Laser
            | OperationKind::Measure
            | OperationKind::Permutation
            | OperationKind::PolarizingBeamSplitter
            | OperationKind::Unitary => &[],
        }
    }

    /// Declared parameter names, in display order.
    pub fn parameter_keys(self) -> impl Iterator<Item = &'static str> {
        self.parameter_defaults().iter().map(|(key, _)| *key)
    }

    /// Catalog default for one declared parameter.
    pub fn default_parameter(self, key: &str) -> Option<f64> {
        self.parameter_defaults()
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
    }

    /// Canonical default parameter set; empty for parameterless kinds.
    pub fn default_parameters(self) -> Parameters {
        self.parameter_defaults()
            .iter()
            .map(|(key, value)| ((*key).to_string(), *value))
            .collect()
    }

    /// Whether the kind declares any parameters.
    pub fn has_parameters(self) -> bool {
        !self.parameter_defaults().is_empty()
    }

    /// Whether `framework` has a native statement for this kind.
    pub fn supported_by(self, framework: Framework) -> bool {
        match framework {
            Framework::StrawberryFields => matches!(
                self,
                OperationKind::Laser
                    | OperationKind::BeamSplitter
                    | OperationKind::PhaseShifter
                    | OperationKind::SqueezeGate
                    | OperationKind::DisplacementGate
                    | OperationKind::KerrGate
                    | OperationKind::Measure
            ),
            Framework::Perceval => !matches!(
                self,
                OperationKind::Laser
                    | OperationKind::SqueezeGate
                    | OperationKind::DisplacementGate
                    | OperationKind::KerrGate
            ),
        }
    }

    /// Number of modes the operation binds.
    pub fn arity(self) -> Arity {
        match self {
            OperationKind::BeamSplitter
            | OperationKind::Permutation
            | OperationKind::PolarizingBeamSplitter
            | OperationKind::Unitary => Arity::DualMode,
            _ => Arity::SingleMode,
        }
    }

    /// Shorthand for `arity() == Arity::DualMode`.
    #[inline]
    pub fn is_multi_mode(self) -> bool {
        self.arity() == Arity::DualMode
    }

    /// Whether this is the (deferred) measurement kind.
    #[inline]
    pub fn is_measurement(self) -> bool {
        self == OperationKind::Measure
    }

    /// Reference documentation shown next to the element.
    pub fn documentation(self) -> &'static [DocSection] {
        const LASER: &[DocSection] = &[
            section(
                "Mathematical Representation",
                "A coherent state |α⟩ is an eigenstate of the annihilation operator â with eigenvalue α.",
                Some("|α⟩ = exp(-|α|²/2) Σₙ αⁿ/√(n!) |n⟩"),
            ),
            section(
                "In Strawberry Fields",
                "Coherent(α) creates a coherent state with complex displacement α.",
                Some("Coherent(r, φ) ⇒ α = r·exp(iφ)"),
            ),
            section(
                "In Perceval",
                "Perceval has no direct equivalent to a laser; single photon sources are the basic inputs.",
                Some("pcvl.Source(emission_probability=1)"),
            ),
        ];
        const BEAM_SPLITTER: &[DocSection] = &[
            section(
                "Mathematical Representation",
                "A beam splitter couples two optical modes with a unitary transformation.",
                Some("U_BS(θ, φ) = exp(θ(e^{iφ} a†b − e^{−iφ} a b†))"),
            ),
            section(
                "In Strawberry Fields",
                "BSgate(θ, φ) implements a beam splitter with transmissivity angle θ and phase φ.",
                Some("BSgate(θ, φ) | (q[m], q[m+1])"),
            ),
            section(
                "In Perceval",
                "pcvl.BS(theta=θ, phi_bl=φ) implements a beam splitter with parameters θ and φ.",
                Some("pcvl.BS(theta=θ, phi_bl=φ)"),
            ),
        ];
        const PHASE_SHIFTER: &[DocSection] = &[
            section(
                "Mathematical Representation",
                "A phase shifter applies a phase rotation to a mode.",
                Some("U(φ) = exp(iφ a†a)"),
            ),
            section(
                "In Strawberry Fields",
                "Rgate(φ) implements a rotation gate with phase φ.",
                Some("Rgate(φ) | q[m]"),
            ),
            section(
                "In Perceval",
                "pcvl.PS(φ) implements a phase shifter with phase φ.",
                Some("pcvl.PS(phi=φ)"),
            ),
        ];
        const SQUEEZE: &[DocSection] = &[
            section(
                "Mathematical Representation",
                "A squeezing operator changes the uncertainty relation between conjugate quadratures.",
                Some("S(z) = exp((z* a² − z a†²)/2)"),
            ),
            section(
                "In Strawberry Fields",
                "Sgate(r, φ) implements a squeezing gate with squeezing parameter r and phase φ.",
                Some("Sgate(r, φ) | q[m]"),
            ),
            section(
                "In Perceval",
                "Squeezing gates are not directly supported in Perceval.",
                None,
            ),
        ];
        const DISPLACEMENT: &[DocSection] = &[
            section(
                "Mathematical Representation",
                "A displacement operator translates a state in phase space.",
                Some("D(α) = exp(α a† − α* a)"),
            ),
            section(
                "In Strawberry Fields",
                "Dgate(r, φ) implements a displacement gate with α = r·exp(iφ).",
                Some("Dgate(r, φ) | q[m]"),
            ),
            section(
                "In Perceval",
                "Displacement gates are not directly supported in Perceval.",
                None,
            ),
        ];
        const KERR: &[DocSection] = &[
            section(
                "Mathematical Representation",
                "The Kerr gate applies a nonlinear phase shift proportional to the photon number squared.",
                Some("K(κ) = exp(iκ n²)"),
            ),
            section(
                "In Strawberry Fields",
                "Kgate(κ) implements a Kerr gate with Kerr parameter κ.",
                Some("Kgate(κ) | q[m]"),
            ),
            section(
                "In Perceval",
                "Kerr gates are not directly supported in Perceval.",
                None,
            ),
        ];
        const MEASURE: &[DocSection] = &[
            section(
                "Mathematical Representation",
                "Photon number measurement projects the state onto Fock states.",
                Some("Πₙ = |n⟩⟨n|"),
            ),
            section(
                "In Strawberry Fields",
                "MeasureFock() measures the photon number in the Fock basis.",
                Some("MeasureFock() | q[m]"),
            ),
            section(
                "In Perceval",
                "Measurement is implicit in Perceval: the simulator computes probabilities for all possible outcomes.",
                Some("pcvl.Detector.pnr()"),
            ),
        ];
        const HWP: &[DocSection] = &[
            section(
                "Description",
                "A half-wave plate rotates the polarization of light by twice the angle of the plate's axis.",
                None,
            ),
            section(
                "In Perceval",
                "pcvl.HWP(θ) implements a half-wave plate with rotation angle θ.",
                Some("pcvl.HWP(θ)"),
            ),
        ];
        const QWP: &[DocSection] = &[
            section(
                "Description",
                "A quarter-wave plate converts between linear and circular polarization.",
                None,
            ),
            section(
                "In Perceval",
                "pcvl.QWP(θ) implements a quarter-wave plate with rotation angle θ.",
                Some("pcvl.QWP(θ)"),
            ),
        ];
        const PERMUTATION: &[DocSection] = &[
            section(
                "Description",
                "A permutation circuit reorders the modes in the optical circuit.",
                None,
            ),
            section(
                "In Perceval",
                "pcvl.PERM(perm_list) permutes modes according to the permutation list.",
                Some("pcvl.PERM([1, 0])"),
            ),
        ];
        const PBS: &[DocSection] = &[
            section(
                "Description",
                "A polarizing beam splitter transmits one polarization while reflecting the orthogonal polarization.",
                None,
            ),
            section(
                "In Perceval",
                "pcvl.PBS() implements a polarizing beam splitter.",
                Some("pcvl.PBS()"),
            ),
        ];
        const TIME_DELAY: &[DocSection] = &[
            section(
                "Description",
                "A time delay component applies a temporal delay to photons in a mode.",
                None,
            ),
            section(
                "In Perceval",
                "pcvl.TD(delay) implements a time delay with the specified delay value.",
                Some("pcvl.TD(delay)"),
            ),
        ];
        const UNITARY: &[DocSection] = &[
            section(
                "Description",
                "A unitary component implements an arbitrary unitary transformation on the optical modes.",
                None,
            ),
            section(
                "In Perceval",
                "pcvl.Unitary(matrix) implements the transformation defined by the given matrix.",
                Some("pcvl.Unitary(pcvl.Matrix(U))"),
            ),
        ];

        match self {
            OperationKind::Laser => LASER,
            OperationKind::BeamSplitter => BEAM_SPLITTER,
            OperationKind::PhaseShifter => PHASE_SHIFTER,
            OperationKind::SqueezeGate => SQUEEZE,
            OperationKind::DisplacementGate => DISPLACEMENT,
            OperationKind::KerrGate => KERR,
            OperationKind::Measure => MEASURE,
            OperationKind::HalfWavePlate => HWP,
            OperationKind::QuarterWavePlate => QWP,
            OperationKind::Permutation => PERMUTATION,
            OperationKind::PolarizingBeamSplitter => PBS,
            OperationKind::TimeDelay => TIME_DELAY,
            OperationKind::Unitary => UNITARY,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OperationKind {
    type Err = IrError;

    /// Accepts either the label ("Beam Splitter") or the snake-case name
    /// ("beam_splitter"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.label().to_ascii_lowercase().replace(' ', "_") == wanted)
            .or(match wanted.as_str() {
                "squeeze_gate" => Some(OperationKind::SqueezeGate),
                "measure" | "measurement" => Some(OperationKind::Measure),
                _ => None,
            })
            .ok_or_else(|| IrError::UnknownKind(s.to_string()))
    }
}

/// Canonical default parameter set for `kind`.
#[inline]
pub fn default_parameters(kind: OperationKind) -> Parameters {
    kind.default_parameters()
}

/// Whether `kind` declares any parameters.
#[inline]
pub fn has_parameters(kind: OperationKind) -> bool {
    kind.has_parameters()
}

/// Whether `framework` has a native statement for `kind`.
#[inline]
pub fn supported_by(kind: OperationKind, framework: Framework) -> bool {
    kind.supported_by(framework)
}

/// Human-readable name for a parameter key; unknown keys display as-is.
pub fn parameter_display_name(key: &str) -> &str {
    match key {
        "phi" => "Phase (φ)",
        "r" => "Amplitude (r)",
        "theta" => "Angle (θ)",
        "kappa" => "Kerr Parameter (κ)",
        "delay" => "Delay",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let bs = default_parameters(OperationKind::BeamSplitter);
        assert_eq!(bs.len(), 2);
        assert_eq!(bs["theta"], 0.5);
        assert!((bs["phi"] - FRAC_PI_4).abs() < 1e-12);

        assert!(default_parameters(OperationKind::Laser).is_empty());
        assert!(default_parameters(OperationKind::Measure).is_empty());
        assert_eq!(default_parameters(OperationKind::TimeDelay)["delay"], 1.0);
    }

    #[test]
    fn test_has_parameters_matches_defaults() {
        for kind in OperationKind::ALL {
            assert_eq!(has_parameters(kind), !kind.default_parameters().is_empty());
        }
        assert!(!has_parameters(OperationKind::Permutation));
        assert!(has_parameters(OperationKind::KerrGate));
    }

    #[test]
    fn test_support_flags() {
        use Framework::{Perceval, StrawberryFields};

        assert!(supported_by(OperationKind::Laser, StrawberryFields));
        assert!(!supported_by(OperationKind::Laser, Perceval));
        assert!(supported_by(OperationKind::KerrGate, StrawberryFields));
        assert!(!supported_by(OperationKind::KerrGate, Perceval));
        assert!(!supported_by(OperationKind::HalfWavePlate, StrawberryFields));
        assert!(supported_by(OperationKind::HalfWavePlate, Perceval));
        assert!(supported_by(OperationKind::BeamSplitter, StrawberryFields));
        assert!(supported_by(OperationKind::BeamSplitter, Perceval));
        assert!(supported_by(OperationKind::Measure, Perceval));
    }

    #[test]
    fn test_every_kind_has_an_entry() {
        for kind in OperationKind::ALL {
            assert!(!kind.label().is_empty());
            assert!(!kind.symbol().is_empty());
            assert!(!kind.description().is_empty());
            assert!(!kind.documentation().is_empty());
            // At least one framework can express every kind.
            assert!(Framework::ALL.iter().any(|fw| kind.supported_by(*fw)));
        }
    }

    #[test]
    fn test_arity() {
        assert!(OperationKind::BeamSplitter.is_multi_mode());
        assert!(OperationKind::PolarizingBeamSplitter.is_multi_mode());
        assert!(!OperationKind::PhaseShifter.is_multi_mode());
        assert_eq!(OperationKind::Measure.arity(), Arity::SingleMode);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "Beam Splitter".parse::<OperationKind>().unwrap(),
            OperationKind::BeamSplitter
        );
        assert_eq!(
            "polarizing_beam_splitter".parse::<OperationKind>().unwrap(),
            OperationKind::PolarizingBeamSplitter
        );
        assert_eq!(
            "measure".parse::<OperationKind>().unwrap(),
            OperationKind::Measure
        );
        assert!("flux capacitor".parse::<OperationKind>().is_err());
    }

    #[test]
    fn test_framework_ids() {
        for fw in Framework::ALL {
            assert_eq!(fw.id().parse::<Framework>().unwrap(), fw);
        }
        assert_eq!(Framework::Perceval.to_string(), "Perceval");
        assert!("qiskit".parse::<Framework>().is_err());
    }

    #[test]
    fn test_parameter_display_names() {
        assert_eq!(parameter_display_name("kappa"), "Kerr Parameter (κ)");
        assert_eq!(parameter_display_name("custom"), "custom");
    }
}
