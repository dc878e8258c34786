//! Per-turn state: the digits typed on the remote, the image the channel landed
//! on, and the interaction lock that keeps timed sequences from overlapping.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ChannelError;

pub const MAX_CHANNEL_DIGITS: usize = 3;

/// A validated channel number in `1..=999`. Displays zero-padded ("007").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(u16);

impl Channel {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 999;

    pub fn new(number: u16) -> Result<Self, ChannelError> {
        if (Self::MIN..=Self::MAX).contains(&number) {
            Ok(Self(number))
        } else {
            Err(ChannelError::InvalidRange)
        }
    }

    /// Parse 1-3 entered digits.
    pub fn parse(digits: &str) -> Result<Self, ChannelError> {
        if digits.is_empty()
            || digits.len() > MAX_CHANNEL_DIGITS
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ChannelError::InvalidRange);
        }
        let number: u16 = digits.parse().map_err(|_| ChannelError::InvalidRange)?;
        Self::new(number)
    }

    pub fn number(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RoundState {
    entered: String,
    assigned_image_id: Option<String>,
    input_locked: bool,
    confirm_ready: bool,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote keypad press. Ignored while locked, when three digits are
    /// already entered, or for a leading zero.
    pub fn push_digit(&mut self, digit: u8) -> bool {
        if self.input_locked || digit > 9 || self.entered.len() >= MAX_CHANNEL_DIGITS {
            return false;
        }
        if self.entered.is_empty() && digit == 0 {
            return false;
        }
        self.entered.push(char::from(b'0' + digit));
        true
    }

    pub fn pop_digit(&mut self) -> bool {
        if self.input_locked {
            return false;
        }
        self.entered.pop().is_some()
    }

    /// Digit typed by the randomize sequence: bypasses the lock and the
    /// leading-zero rule (generated channels are already zero-padded).
    pub(crate) fn reveal_digit(&mut self, digit: char) {
        if self.entered.len() < MAX_CHANNEL_DIGITS && digit.is_ascii_digit() {
            self.entered.push(digit);
        }
    }

    pub(crate) fn clear_digits(&mut self) {
        self.entered.clear();
    }

    pub fn entered(&self) -> &str {
        &self.entered
    }

    /// Text for the channel display: padded digits, or "000" when nothing is entered.
    pub fn display(&self) -> String {
        if self.entered.is_empty() {
            "000".to_string()
        } else {
            format!("{:0>3}", self.entered)
        }
    }

    pub fn channel(&self) -> Result<Channel, ChannelError> {
        Channel::parse(&self.entered)
    }

    pub fn is_locked(&self) -> bool {
        self.input_locked
    }

    pub(crate) fn lock(&mut self) {
        self.input_locked = true;
    }

    pub(crate) fn unlock(&mut self) {
        self.input_locked = false;
    }

    pub fn assigned_image_id(&self) -> Option<&str> {
        self.assigned_image_id.as_deref()
    }

    pub(crate) fn assign_image(&mut self, image_id: String) {
        self.assigned_image_id = Some(image_id);
    }

    pub fn is_confirm_ready(&self) -> bool {
        self.confirm_ready
    }

    pub(crate) fn mark_confirm_ready(&mut self) {
        self.confirm_ready = true;
    }
}
