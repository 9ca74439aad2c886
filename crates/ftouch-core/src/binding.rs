#![forbid(unsafe_code)]

//! Gesture names, handler modifiers, and directive-style bindings.
//!
//! A binding is what a host integration hands to the recognizer: a gesture
//! name plus a set of [`Modifiers`]. Hosts that use the `name.mod.mod`
//! directive form (for example `swipe.left.stop`) can parse it with
//! [`Binding::parse`].
//!
//! # Compound names
//!
//! `swipe` and `pan` bindings carrying directional modifiers are stored under
//! one compound name per direction (`swipe.left`, `pan.top`, ...) so the
//! dispatch path filters by direction with a plain table lookup.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Cardinal direction of a swipe or pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Wire name (`left`, `right`, `top`, `bottom`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    /// The matching directional modifier flag.
    #[must_use]
    pub const fn modifier(self) -> Modifiers {
        match self {
            Self::Left => Modifiers::LEFT,
            Self::Right => Modifiers::RIGHT,
            Self::Top => Modifiers::TOP,
            Self::Bottom => Modifiers::BOTTOM,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

bitflags! {
    /// Per-handler modifiers.
    ///
    /// `STOP`, `PREVENT` and `SELF` apply to every gesture. The directional
    /// flags only affect `swipe` and `pan` registrations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE    = 0;
        /// Stop propagation of the raw event.
        const STOP    = 1 << 0;
        /// Prevent the default browser action.
        const PREVENT = 1 << 1;
        /// Only fire when the raw event targeted the bound element itself.
        const SELF    = 1 << 2;
        const LEFT    = 1 << 3;
        const RIGHT   = 1 << 4;
        const TOP     = 1 << 5;
        const BOTTOM  = 1 << 6;
        /// All directional flags.
        const DIRECTIONS = Self::LEFT.bits() | Self::RIGHT.bits() | Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// Parse one directive modifier (`stop`, `left`, ...). Unknown names yield `None`.
    #[must_use]
    pub fn from_directive(name: &str) -> Option<Self> {
        match name {
            "stop" => Some(Self::STOP),
            "prevent" => Some(Self::PREVENT),
            "self" => Some(Self::SELF),
            _ => Direction::from_name(name).map(Direction::modifier),
        }
    }

    /// Directions selected by this set, in `left, right, top, bottom` order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.contains(d.modifier()))
    }
}

// ---------------------------------------------------------------------------
// GestureName
// ---------------------------------------------------------------------------

/// Name of a gesture notification, used as the dispatch table key.
///
/// Parsing never fails: names the recognizer does not know become
/// [`GestureName::Other`], which can be registered but is never dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GestureName {
    Tap,
    Start,
    End,
    Moved,
    Moving,
    LongPress,
    LongTap,
    /// `swipe` (bare) or `swipe.<direction>`.
    Swipe(Option<Direction>),
    /// `pan` (bare) or `pan.<direction>`.
    Pan(Option<Direction>),
    Other(String),
}

impl GestureName {
    /// Parse a wire name such as `tap`, `longpress` or `swipe.left`.
    ///
    /// An empty name means `tap`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "" | "tap" => Self::Tap,
            "start" => Self::Start,
            "end" => Self::End,
            "moved" => Self::Moved,
            "moving" => Self::Moving,
            "longpress" => Self::LongPress,
            "longtap" => Self::LongTap,
            "swipe" => Self::Swipe(None),
            "pan" => Self::Pan(None),
            other => {
                let compound = other.split_once('.').and_then(|(base, dir)| {
                    let dir = Direction::from_name(dir)?;
                    match base {
                        "swipe" => Some(Self::Swipe(Some(dir))),
                        "pan" => Some(Self::Pan(Some(dir))),
                        _ => None,
                    }
                });
                compound.unwrap_or_else(|| Self::Other(other.to_owned()))
            }
        }
    }

    /// Direction suffix of a compound name.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        match self {
            Self::Swipe(dir) | Self::Pan(dir) => *dir,
            _ => None,
        }
    }

    /// True for `swipe`/`pan` without a direction suffix.
    #[must_use]
    pub const fn accepts_directions(&self) -> bool {
        matches!(self, Self::Swipe(None) | Self::Pan(None))
    }

    /// The same gesture with a direction suffix (swipe/pan only).
    #[must_use]
    pub fn with_direction(&self, direction: Direction) -> Self {
        match self {
            Self::Swipe(_) => Self::Swipe(Some(direction)),
            Self::Pan(_) => Self::Pan(Some(direction)),
            other => other.clone(),
        }
    }

    /// The same gesture without a direction suffix.
    #[must_use]
    pub fn bare(&self) -> Self {
        match self {
            Self::Swipe(_) => Self::Swipe(None),
            Self::Pan(_) => Self::Pan(None),
            other => other.clone(),
        }
    }
}

impl Default for GestureName {
    fn default() -> Self {
        Self::Tap
    }
}

impl FromStr for GestureName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for GestureName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for GestureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap => f.write_str("tap"),
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
            Self::Moved => f.write_str("moved"),
            Self::Moving => f.write_str("moving"),
            Self::LongPress => f.write_str("longpress"),
            Self::LongTap => f.write_str("longtap"),
            Self::Swipe(None) => f.write_str("swipe"),
            Self::Swipe(Some(dir)) => write!(f, "swipe.{dir}"),
            Self::Pan(None) => f.write_str("pan"),
            Self::Pan(Some(dir)) => write!(f, "pan.{dir}"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// A gesture name plus modifiers, as declared by a host integration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Binding {
    pub name: GestureName,
    pub modifiers: Modifiers,
}

impl Binding {
    #[must_use]
    pub fn new(name: impl Into<GestureName>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            modifiers,
        }
    }

    /// Parse the directive form `name.modifier.modifier`.
    ///
    /// An empty name means `tap`. Unknown modifiers are ignored.
    #[must_use]
    pub fn parse(directive: &str) -> Self {
        let mut parts = directive.split('.');
        let name = GestureName::parse(parts.next().unwrap_or_default());
        let modifiers = parts
            .filter_map(Modifiers::from_directive)
            .fold(Modifiers::NONE, |acc, m| acc | m);
        Self { name, modifiers }
    }

    /// Dispatch table keys this binding is stored under.
    ///
    /// Bare `swipe`/`pan` with directional modifiers expand to one compound
    /// name per direction; everything else is stored under its own name.
    #[must_use]
    pub fn registration_names(&self) -> Vec<GestureName> {
        if self.name.accepts_directions() && self.modifiers.intersects(Modifiers::DIRECTIONS) {
            self.modifiers
                .directions()
                .map(|dir| self.name.with_direction(dir))
                .collect()
        } else {
            vec![self.name.clone()]
        }
    }
}

impl FromStr for Binding {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
