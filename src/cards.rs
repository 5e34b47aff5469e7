use std::fmt;
use std::str::FromStr;

/// Pip-card ranks from Ace (counted as 1) to King.
/// Court ranks carry fixed values above ten: Page 11, Knight 12, Queen 13, King 14.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Page = 11,
    Knight = 12,
    Queen = 13,
    King = 14,
}

impl Rank {
    pub const ALL: [Rank; 14] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Page,
        Rank::Knight,
        Rank::Queen,
        Rank::King,
    ];

    /// Face value used by the primary scoring pass (ace counts 1 here;
    /// the evaluator decides whether to promote it to 11).
    pub const fn pip_value(self) -> i32 {
        self as i32
    }

    /// Value used for high-card tie-breaks, where an ace counts 11.
    pub const fn high_card_value(self) -> i32 {
        match self {
            Rank::Ace => 11,
            r => r as i32,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            Rank::Ace => "1",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Page => "P",
            Rank::Knight => "N",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let r = match upper.as_str() {
            "1" | "A" => Rank::Ace,
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" => Rank::Ten,
            "P" => Rank::Page,
            "N" => Rank::Knight,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            _ => return Err(RankParseError::Invalid(s.to_string())),
        };
        Ok(r)
    }
}

/// The four tarot suits. Showdown suit precedence is W > C > S > D,
/// with trumps below all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Disks,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Wands, Suit::Cups, Suit::Swords, Suit::Disks];

    pub const fn to_char(self) -> char {
        match self {
            Suit::Wands => 'W',
            Suit::Cups => 'C',
            Suit::Swords => 'S',
            Suit::Disks => 'D',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Wands => "Wands",
            Suit::Cups => "Cups",
            Suit::Swords => "Swords",
            Suit::Disks => "Disks",
        }
    }

    /// Tie-break precedence; higher wins.
    pub const fn precedence(self) -> u8 {
        match self {
            Suit::Wands => 4,
            Suit::Cups => 3,
            Suit::Swords => 2,
            Suit::Disks => 1,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuitParseError {
    #[error("invalid suit: '{0}'")]
    Invalid(String),
}

impl TryFrom<char> for Suit {
    type Error = SuitParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'W' => Ok(Suit::Wands),
            'C' => Ok(Suit::Cups),
            'S' => Ok(Suit::Swords),
            'D' => Ok(Suit::Disks),
            _ => Err(SuitParseError::Invalid(c.to_string())),
        }
    }
}

/// The 22 trionfi (trump cards), numbered 0 through 21.
///
/// Each trump is a passive point modifier, a playable effect, or plain
/// filler; the closed enum keeps every effect dispatch exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Trionfo {
    Fool = 0,
    Magician = 1,
    HighPriestess = 2,
    Empress = 3,
    Emperor = 4,
    Hierophant = 5,
    Lovers = 6,
    Chariot = 7,
    Strength = 8,
    Hermit = 9,
    WheelOfFortune = 10,
    Justice = 11,
    HangedMan = 12,
    Death = 13,
    Temperance = 14,
    Devil = 15,
    Tower = 16,
    Star = 17,
    Moon = 18,
    Sun = 19,
    Judgment = 20,
    Universe = 21,
}

impl Trionfo {
    pub const ALL: [Trionfo; 22] = [
        Trionfo::Fool,
        Trionfo::Magician,
        Trionfo::HighPriestess,
        Trionfo::Empress,
        Trionfo::Emperor,
        Trionfo::Hierophant,
        Trionfo::Lovers,
        Trionfo::Chariot,
        Trionfo::Strength,
        Trionfo::Hermit,
        Trionfo::WheelOfFortune,
        Trionfo::Justice,
        Trionfo::HangedMan,
        Trionfo::Death,
        Trionfo::Temperance,
        Trionfo::Devil,
        Trionfo::Tower,
        Trionfo::Star,
        Trionfo::Moon,
        Trionfo::Sun,
        Trionfo::Judgment,
        Trionfo::Universe,
    ];

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn from_number(n: u8) -> Option<Trionfo> {
        if n < 22 {
            Some(Self::ALL[n as usize])
        } else {
            None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Trionfo::Fool => "The Fool",
            Trionfo::Magician => "The Magician",
            Trionfo::HighPriestess => "The High Priestess",
            Trionfo::Empress => "The Empress",
            Trionfo::Emperor => "The Emperor",
            Trionfo::Hierophant => "The Hierophant",
            Trionfo::Lovers => "The Lovers",
            Trionfo::Chariot => "The Chariot",
            Trionfo::Strength => "Strength",
            Trionfo::Hermit => "The Hermit",
            Trionfo::WheelOfFortune => "Wheel of Fortune",
            Trionfo::Justice => "Justice",
            Trionfo::HangedMan => "The Hanged Man",
            Trionfo::Death => "Death",
            Trionfo::Temperance => "Temperance",
            Trionfo::Devil => "The Devil",
            Trionfo::Tower => "The Tower",
            Trionfo::Star => "The Star",
            Trionfo::Moon => "The Moon",
            Trionfo::Sun => "The Sun",
            Trionfo::Judgment => "The Last Judgment",
            Trionfo::Universe => "The Universe",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Trionfo::Fool => "No special effect",
            Trionfo::Magician => "Rearrange the top 4 cards of the draw pile",
            Trionfo::HighPriestess => "-2 points",
            Trionfo::Empress => "-3 points",
            Trionfo::Emperor => "Target must ante, discard 2 cards, or fold",
            Trionfo::Hierophant => "All others reveal their hand value or fold",
            Trionfo::Lovers => "+6 or -6 points, whichever helps more",
            Trionfo::Chariot => "All others discard 1 card or fold",
            Trionfo::Strength => "-8 points",
            Trionfo::Hermit => "Withdraw to showdown, immune to effects",
            Trionfo::WheelOfFortune => "Draw 4 cards, keep any of them",
            Trionfo::Justice => "-11 points",
            Trionfo::HangedMan => "Nullify a trump effect as it is played",
            Trionfo::Death => "-13 points",
            Trionfo::Temperance => "-14 points",
            Trionfo::Devil => "-15 points; may be given to another player",
            Trionfo::Tower => "-16 points",
            Trionfo::Star => "-17 points",
            Trionfo::Moon => "Deal one extra community card",
            Trionfo::Sun => "All hands play face up",
            Trionfo::Judgment => "The hand ends immediately; straight to showdown",
            Trionfo::Universe => "Peek at the top 6 cards of the draw pile",
        }
    }

    /// Fixed point contribution to hand value. The Lovers is not covered
    /// here: its +6/-6 choice is resolved last by the evaluator.
    pub const fn point_value(self) -> i32 {
        match self {
            Trionfo::HighPriestess => -2,
            Trionfo::Empress => -3,
            Trionfo::Strength => -8,
            Trionfo::Justice => -11,
            Trionfo::Death => -13,
            Trionfo::Temperance => -14,
            Trionfo::Devil => -15,
            Trionfo::Tower => -16,
            Trionfo::Star => -17,
            _ => 0,
        }
    }

    /// Whether playing this trump invokes a handler (as opposed to a
    /// passive point modifier scored by the evaluator).
    pub const fn has_effect(self) -> bool {
        matches!(
            self,
            Trionfo::Magician
                | Trionfo::Emperor
                | Trionfo::Hierophant
                | Trionfo::Chariot
                | Trionfo::Hermit
                | Trionfo::WheelOfFortune
                | Trionfo::HangedMan
                | Trionfo::Devil
                | Trionfo::Moon
                | Trionfo::Sun
                | Trionfo::Judgment
                | Trionfo::Universe
        )
    }

    /// Interrupt-eligible: playable outside the holder's own turn, in
    /// response to another trump effect.
    pub const fn can_play_anytime(self) -> bool {
        matches!(self, Trionfo::HangedMan)
    }

    /// The card is not consumed when its effect is used.
    pub const fn stays_in_hand(self) -> bool {
        matches!(self, Trionfo::Hermit | Trionfo::Sun)
    }
}

impl fmt::Display for Trionfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A tarot card: one of 56 pip cards or 22 trionfi.
///
/// Cards are plain value types; identity is value equality.
///
/// ```
/// use tarocchi::cards::{Card, Rank, Suit, Trionfo};
///
/// let ten = Card::pip(Rank::Ten, Suit::Wands);
/// assert_eq!(ten.to_string(), "10W");
/// let devil = Card::trionfo(Trionfo::Devil);
/// assert_eq!(devil.to_string(), "15T");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Card {
    Pip(Rank, Suit),
    Trionfo(Trionfo),
}

impl Card {
    pub const fn pip(rank: Rank, suit: Suit) -> Self {
        Card::Pip(rank, suit)
    }

    pub const fn trionfo(t: Trionfo) -> Self {
        Card::Trionfo(t)
    }

    pub const fn is_trionfo(self) -> bool {
        matches!(self, Card::Trionfo(_))
    }

    pub const fn as_trionfo(self) -> Option<Trionfo> {
        match self {
            Card::Trionfo(t) => Some(t),
            Card::Pip(..) => None,
        }
    }

    /// Suit symbol: one of the four suits or `T` for trionfi.
    pub const fn suit_char(self) -> char {
        match self {
            Card::Pip(_, s) => s.to_char(),
            Card::Trionfo(_) => 'T',
        }
    }

    pub const fn suit_name(self) -> &'static str {
        match self {
            Card::Pip(_, s) => s.name(),
            Card::Trionfo(_) => "Trionfi",
        }
    }

    /// Suit precedence for the final showdown tie-break (W > C > S > D > T).
    pub const fn suit_precedence(self) -> u8 {
        match self {
            Card::Pip(_, s) => s.precedence(),
            Card::Trionfo(_) => 0,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Pip(r, s) => write!(f, "{r}{s}"),
            Card::Trionfo(t) => write!(f, "{}T", t.number()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error(transparent)]
    Rank(#[from] RankParseError),
    #[error(transparent)]
    Suit(#[from] SuitParseError),
}

impl FromStr for Card {
    type Err = CardParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.len() < 2 {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        // rank token is everything but the last char; suit symbol is the last
        let (rank_str, suit_str) = t.split_at(t.len() - 1);
        let suit_ch = suit_str.chars().next().unwrap_or(' ');
        if suit_ch.eq_ignore_ascii_case(&'T') {
            let n: u8 = rank_str
                .parse()
                .map_err(|_| CardParseError::Invalid(s.to_string()))?;
            let trionfo =
                Trionfo::from_number(n).ok_or_else(|| CardParseError::Invalid(s.to_string()))?;
            return Ok(Card::Trionfo(trionfo));
        }
        let rank = Rank::from_str(rank_str)?;
        let suit = Suit::try_from(suit_ch)?;
        Ok(Card::Pip(rank, suit))
    }
}

/// Parse multiple cards separated by whitespace or commas.
///
/// ```
/// use tarocchi::cards::{parse_cards, Card, Rank, Suit, Trionfo};
///
/// let cards = parse_cards("10W, KC 6T").unwrap();
/// assert_eq!(cards[0], Card::pip(Rank::Ten, Suit::Wands));
/// assert_eq!(cards[1], Card::pip(Rank::King, Suit::Cups));
/// assert_eq!(cards[2], Card::trionfo(Trionfo::Lovers));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_display_and_from_str() {
        assert_eq!(Rank::Ace.to_string(), "1");
        assert_eq!(Rank::Ten.to_string(), "10");
        assert_eq!(Rank::from_str("10").unwrap(), Rank::Ten);
        assert_eq!(Rank::from_str("N").unwrap(), Rank::Knight);
        assert!(Rank::from_str("11").is_err());
    }

    #[test]
    fn court_values() {
        assert_eq!(Rank::Page.pip_value(), 11);
        assert_eq!(Rank::King.pip_value(), 14);
        assert_eq!(Rank::Ace.pip_value(), 1);
        assert_eq!(Rank::Ace.high_card_value(), 11);
    }

    #[test]
    fn suit_precedence_order() {
        assert!(Suit::Wands.precedence() > Suit::Cups.precedence());
        assert!(Suit::Cups.precedence() > Suit::Swords.precedence());
        assert!(Suit::Swords.precedence() > Suit::Disks.precedence());
        assert!(Suit::Disks.precedence() > Card::trionfo(Trionfo::Sun).suit_precedence());
    }

    #[test]
    fn trionfo_numbers_round_trip() {
        for t in Trionfo::ALL {
            assert_eq!(Trionfo::from_number(t.number()), Some(t));
        }
        assert_eq!(Trionfo::from_number(22), None);
    }

    #[test]
    fn negative_trionfi_values() {
        assert_eq!(Trionfo::Devil.point_value(), -15);
        assert_eq!(Trionfo::Star.point_value(), -17);
        assert_eq!(Trionfo::Fool.point_value(), 0);
        // Lovers resolves at evaluation time, not here
        assert_eq!(Trionfo::Lovers.point_value(), 0);
    }

    #[test]
    fn every_trionfo_classifies() {
        let with_effect = Trionfo::ALL.iter().filter(|t| t.has_effect()).count();
        assert_eq!(with_effect, 12);
        assert!(Trionfo::HangedMan.can_play_anytime());
        assert!(Trionfo::Hermit.stays_in_hand());
        assert!(Trionfo::Sun.stays_in_hand());
        assert!(!Trionfo::Judgment.stays_in_hand());
    }

    #[test]
    fn card_display_and_from_str() {
        let c = Card::pip(Rank::Ace, Suit::Swords);
        assert_eq!(c.to_string(), "1S");
        assert_eq!(Card::from_str("1S").unwrap(), c);
        assert_eq!(Card::from_str("10d").unwrap(), Card::pip(Rank::Ten, Suit::Disks));
        assert_eq!(Card::from_str("21T").unwrap(), Card::trionfo(Trionfo::Universe));
        assert!(Card::from_str("22T").is_err());
        assert!(Card::from_str("X").is_err());
    }

    #[test]
    fn parse_many_cards() {
        let xs = parse_cards("10W, KC 15T").unwrap();
        assert_eq!(xs.len(), 3);
        assert_eq!(xs[2], Card::trionfo(Trionfo::Devil));
    }
}
