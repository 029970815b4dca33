//! Wrapper command kinds
//!
//! The wrapper commands form a closed enumeration dispatched through one
//! executor call with a uniform (name, value, selection, state) record.
//! Values are validated against closed tables before dispatch; unknown
//! names fail before any engine mutation.

use std::fmt;
use std::str::FromStr;

use phf::phf_set;

use crate::error::{BridgeError, BridgeResult};

/// Supported wrapper commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Change atom annotations via an engine expression
    Alter,
    /// Set the cartoon type
    Cartoon,
    /// Center the view
    Center,
    /// Alter the clipping planes
    Clip,
    /// Color atoms
    Color,
    /// Reduce color saturation
    Desaturate,
    /// Hide an object from the viewer list
    Disable,
    /// Assign secondary structure
    Dss,
    /// Show an object in the viewer list
    Enable,
    /// Hide a representation
    Hide,
    /// Indicate a selection
    Indicate,
    /// Align the view to a selection
    Orient,
    /// Move the rotation origin
    Origin,
    /// Create a named selection
    Select,
    /// Change a setting on atoms
    Set,
    /// Change a setting on bonds
    SetBond,
    /// Show a representation
    Show,
    /// Show one representation exclusively
    ShowAs,
    /// Smooth coordinates over states
    Smooth,
    /// Color atoms along a property ramp
    Spectrum,
    /// Clear a setting on atoms
    Unset,
    /// Clear a setting on bonds
    UnsetBond,
    /// Zoom the view onto a selection
    Zoom,
}

/// What a command expects in its value slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    /// No value accepted
    None,
    /// A representation name; optional (absent means "everything")
    Representation,
    /// A cartoon type name; required
    CartoonType,
    /// A color; required
    Color,
    /// Free-form value; required
    Required,
    /// Free-form value; optional
    Optional,
}

impl CommandKind {
    /// Engine-side command name
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Alter => "alter",
            CommandKind::Cartoon => "cartoon",
            CommandKind::Center => "center",
            CommandKind::Clip => "clip",
            CommandKind::Color => "color",
            CommandKind::Desaturate => "desaturate",
            CommandKind::Disable => "disable",
            CommandKind::Dss => "dss",
            CommandKind::Enable => "enable",
            CommandKind::Hide => "hide",
            CommandKind::Indicate => "indicate",
            CommandKind::Orient => "orient",
            CommandKind::Origin => "origin",
            CommandKind::Select => "select",
            CommandKind::Set => "set",
            CommandKind::SetBond => "set_bond",
            CommandKind::Show => "show",
            CommandKind::ShowAs => "show_as",
            CommandKind::Smooth => "smooth",
            CommandKind::Spectrum => "spectrum",
            CommandKind::Unset => "unset",
            CommandKind::UnsetBond => "unset_bond",
            CommandKind::Zoom => "zoom",
        }
    }

    pub(crate) fn value_kind(&self) -> ValueKind {
        match self {
            CommandKind::Show | CommandKind::Hide => ValueKind::Representation,
            CommandKind::ShowAs => ValueKind::Representation,
            CommandKind::Cartoon => ValueKind::CartoonType,
            CommandKind::Color => ValueKind::Color,
            CommandKind::Alter
            | CommandKind::Select
            | CommandKind::Set
            | CommandKind::SetBond
            | CommandKind::Unset
            | CommandKind::UnsetBond => ValueKind::Required,
            CommandKind::Clip | CommandKind::Spectrum => ValueKind::Optional,
            CommandKind::Center
            | CommandKind::Desaturate
            | CommandKind::Disable
            | CommandKind::Dss
            | CommandKind::Enable
            | CommandKind::Indicate
            | CommandKind::Orient
            | CommandKind::Origin
            | CommandKind::Smooth
            | CommandKind::Zoom => ValueKind::None,
        }
    }
}

impl FromStr for CommandKind {
    type Err = BridgeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "alter" => Ok(CommandKind::Alter),
            "cartoon" => Ok(CommandKind::Cartoon),
            "center" => Ok(CommandKind::Center),
            "clip" => Ok(CommandKind::Clip),
            "color" => Ok(CommandKind::Color),
            "desaturate" => Ok(CommandKind::Desaturate),
            "disable" => Ok(CommandKind::Disable),
            "dss" => Ok(CommandKind::Dss),
            "enable" => Ok(CommandKind::Enable),
            "hide" => Ok(CommandKind::Hide),
            "indicate" => Ok(CommandKind::Indicate),
            "orient" => Ok(CommandKind::Orient),
            "origin" => Ok(CommandKind::Origin),
            "select" => Ok(CommandKind::Select),
            "set" => Ok(CommandKind::Set),
            "set_bond" => Ok(CommandKind::SetBond),
            "show" => Ok(CommandKind::Show),
            "show_as" => Ok(CommandKind::ShowAs),
            "smooth" => Ok(CommandKind::Smooth),
            "spectrum" => Ok(CommandKind::Spectrum),
            "unset" => Ok(CommandKind::Unset),
            "unset_bond" => Ok(CommandKind::UnsetBond),
            "zoom" => Ok(CommandKind::Zoom),
            _ => Err(BridgeError::UnknownCommand(name.to_string())),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated command ready for dispatch
///
/// The uniform record handed to the engine: command name, optional value,
/// compiled selection expression, optional state.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Which command to run
    pub kind: CommandKind,
    /// Validated value (representation, color, expression, ...)
    pub value: Option<String>,
    /// Compiled selection expression scoped to one object
    pub selection: String,
    /// State the command applies to (1-based; None = all/current)
    pub state: Option<usize>,
}

impl fmt::Display for CommandSpec {
    /// Engine command-line form, e.g. `color green, model m and (index 1-5)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.name())?;
        match &self.value {
            Some(value) => write!(f, " {value}, {}", self.selection)?,
            None => write!(f, " {}", self.selection)?,
        }
        if let Some(state) = self.state {
            write!(f, ", state={state}")?;
        }
        Ok(())
    }
}

/// Canonicalize a representation name
///
/// Returns the engine-side name, or `None` for unknown representations.
pub fn parse_representation(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "lines" | "line" => Some("lines"),
        "sticks" | "stick" => Some("sticks"),
        "spheres" | "sphere" => Some("spheres"),
        "surface" | "surf" => Some("surface"),
        "mesh" => Some("mesh"),
        "dots" | "dot" => Some("dots"),
        "cartoon" | "cart" => Some("cartoon"),
        "ribbon" | "ribb" => Some("ribbon"),
        "labels" | "label" => Some("labels"),
        "nonbonded" | "nb_spheres" => Some("nonbonded"),
        "everything" | "all" => Some("everything"),
        _ => None,
    }
}

/// Cartoon types understood by the engine
static CARTOON_TYPES: phf::Set<&'static str> = phf_set! {
    "automatic", "skip", "loop", "rectangle", "oval", "tube", "arrow",
    "dumbbell", "putty",
};

/// Check a cartoon type name
pub fn is_cartoon_type(name: &str) -> bool {
    CARTOON_TYPES.contains(name)
}

/// Named colors understood by the engine
static NAMED_COLORS: phf::Set<&'static str> = phf_set! {
    "white", "black", "red", "green", "blue", "yellow", "cyan", "magenta",
    "orange", "pink", "purple", "salmon", "olive", "firebrick", "chocolate",
    "wheat", "violet", "marine", "slate", "forest", "deepteal", "hotpink",
    "yelloworange", "limegreen", "skyblue",
    "gray", "grey", "gray10", "gray20", "gray30", "gray40", "gray50",
    "gray60", "gray70", "gray80", "gray90",
    "carbon", "nitrogen", "oxygen", "hydrogen", "sulfur",
};

/// Validate a color value: a known name or an `[r, g, b]` literal
///
/// Returns the canonical value string for dispatch.
pub fn parse_color(value: &str) -> BridgeResult<String> {
    let value = value.trim();
    if NAMED_COLORS.contains(value) {
        return Ok(value.to_string());
    }
    // RGB literal: three floats in 0..=1, bracketed
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let components: Vec<f32> = inner
            .split(',')
            .map(|c| c.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|_| BridgeError::InvalidColor(value.to_string()))?;
        if components.len() == 3
            && components.iter().all(|c| (0.0..=1.0).contains(c))
        {
            return Ok(format!(
                "[{}, {}, {}]",
                components[0], components[1], components[2]
            ));
        }
    }
    Err(BridgeError::InvalidColor(value.to_string()))
}

/// Validate a command value against the command's value kind
pub(crate) fn validate_value(
    kind: CommandKind,
    value: Option<&str>,
) -> BridgeResult<Option<String>> {
    match (kind.value_kind(), value) {
        (ValueKind::None, None) => Ok(None),
        (ValueKind::None, Some(_)) => Err(BridgeError::invalid_arg(
            kind.name(),
            "command takes no value",
        )),
        (ValueKind::Representation, None) => Ok(None),
        (ValueKind::Representation, Some(name)) => parse_representation(name)
            .map(|rep| Some(rep.to_string()))
            .ok_or_else(|| BridgeError::InvalidRepresentation(name.to_string())),
        (ValueKind::CartoonType, None) => Err(BridgeError::MissingArgument("type")),
        (ValueKind::CartoonType, Some(name)) => {
            if is_cartoon_type(name) {
                Ok(Some(name.to_string()))
            } else {
                Err(BridgeError::invalid_arg(
                    "type",
                    format!("unknown cartoon type: {name}"),
                ))
            }
        }
        (ValueKind::Color, None) => Err(BridgeError::MissingArgument("color")),
        (ValueKind::Color, Some(color)) => parse_color(color).map(Some),
        (ValueKind::Required, None) => Err(BridgeError::MissingArgument("value")),
        (ValueKind::Required, Some(value)) | (ValueKind::Optional, Some(value)) => {
            Ok(Some(value.to_string()))
        }
        (ValueKind::Optional, None) => Ok(None),
    }
}
