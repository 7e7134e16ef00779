//! The closed set of mnemonics and directives recognized by the assembler.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::vocabulary::Code;

/// Condition suffix of a branch mnemonic.
///
/// `b` and `bl` branch unconditionally, the other branches test the condition flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Unconditional branch. (`b`, `bl`)
    Always,
    /// Zero flag set. (`eq`)
    Equal,
    /// Zero flag clear. (`ne`)
    NotEqual,
    /// Carry flag set. (`cs`)
    CarrySet,
    /// Carry flag clear. (`cc`)
    CarryClear,
    /// Negative flag set. (`mi`)
    Minus,
    /// Negative flag clear. (`pl`)
    Plus,
    /// Overflow flag set. (`vs`)
    OverflowSet,
    /// Overflow flag clear. (`vc`)
    OverflowClear,
    /// Unsigned higher. (`hi`)
    Higher,
    /// Unsigned lower or same. (`ls`)
    LowerOrSame,
    /// Signed greater than or equal. (`ge`)
    GreaterOrEqual,
    /// Signed less than. (`lt`)
    LessThan,
    /// Signed greater than. (`gt`)
    GreaterThan,
    /// Signed less than or equal. (`le`)
    LessOrEqual,
}

impl Condition {
    /// The suffix appended to `b`/`bl` to form the branch mnemonic.
    pub fn suffix(&self) -> &'static str {
        match self {
            Condition::Always => "",
            Condition::Equal => "eq",
            Condition::NotEqual => "ne",
            Condition::CarrySet => "cs",
            Condition::CarryClear => "cc",
            Condition::Minus => "mi",
            Condition::Plus => "pl",
            Condition::OverflowSet => "vs",
            Condition::OverflowClear => "vc",
            Condition::Higher => "hi",
            Condition::LowerOrSame => "ls",
            Condition::GreaterOrEqual => "ge",
            Condition::LessThan => "lt",
            Condition::GreaterThan => "gt",
            Condition::LessOrEqual => "le",
        }
    }
}

macro_rules! mnemonics {
    ( $( $variant:ident => $text:literal ),+ $(,)? ) => {
        /// Discriminant of a recognized mnemonic or directive.
        ///
        /// [Mnemonic::Invalid] is the sentinel returned for every token that is not part of
        /// the vocabulary. It is never assigned to a vocabulary entry.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum Mnemonic {
            Invalid,
            $( $variant, )+
        }

        impl Mnemonic {
            /// Every mnemonic except [Mnemonic::Invalid], in discriminant order.
            pub const ALL: &'static [Mnemonic] = &[ $( Mnemonic::$variant, )+ ];

            /// The source text of the mnemonic.
            pub fn as_str(&self) -> &'static str {
                match self {
                    Mnemonic::Invalid => "invalid",
                    $( Mnemonic::$variant => $text, )+
                }
            }
        }
    };
}

mnemonics! {
    // Loads and stores
    Ld => "ld", Ldb => "ldb", Ldh => "ldh", Ldsb => "ldsb", Ldsh => "ldsh",
    St => "st", Stb => "stb", Sth => "sth", Stsb => "stsb", Stsh => "stsh",
    Push => "push", Pop => "pop",
    Smv => "smv", Scl => "scl", Sst => "sst",

    // Arithmetic and logic
    Add => "add", Adc => "adc", Sub => "sub", Sbc => "sbc",
    And => "and", Or => "or", Xor => "xor", Btc => "btc",
    Addk => "addk", Adck => "adck", Subk => "subk", Sbck => "sbck",
    Andk => "andk", Ork => "ork", Xork => "xork", Btck => "btck",
    Nop => "nop",
    Tst => "tst", Teq => "teq", Cmp => "cmp", Cpn => "cpn",
    Lsl => "lsl", Lsr => "lsr", Asr => "asr", Lslk => "lslk",
    Mov => "mov", Not => "not", Notk => "notk",

    // Branches
    B => "b", Beq => "beq", Bne => "bne", Bcs => "bcs", Bcc => "bcc",
    Bmi => "bmi", Bpl => "bpl", Bvs => "bvs", Bvc => "bvc", Bhi => "bhi",
    Bls => "bls", Bge => "bge", Blt => "blt", Bgt => "bgt", Ble => "ble",
    Bl => "bl", Bleq => "bleq", Blne => "blne", Blcs => "blcs", Blcc => "blcc",
    Blmi => "blmi", Blpl => "blpl", Blvs => "blvs", Blvc => "blvc", Blhi => "blhi",
    Blls => "blls", Blge => "blge", Bllt => "bllt", Blgt => "blgt", Blle => "blle",

    Mvi => "mvi",
    Swi => "swi",
    M32 => "m32",
    Addr => "addr",

    // Directives
    Word => "word", Half => "half", Byte => "byte", Ascii => "ascii", Align => "align",
}

impl Mnemonic {
    /// Numeric discriminant. [Mnemonic::Invalid] is `0`, the rest follow [Mnemonic::ALL].
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Returns `true` for assembler directives (`word`, `half`, `byte`, `ascii`, `align`).
    pub fn is_directive(&self) -> bool {
        match self {
            Mnemonic::Word | Mnemonic::Half | Mnemonic::Byte | Mnemonic::Ascii | Mnemonic::Align => true,
            _ => false,
        }
    }

    /// Returns `true` for the branch-and-link family (`bl`, `bleq`, ...).
    pub fn is_link(&self) -> bool {
        // "bl" + suffix, as opposed to "b" + suffix. ("ble" is a plain branch.)
        match self.condition() {
            Some(condition) => self.as_str().len() == 2 + condition.suffix().len(),
            None => false,
        }
    }

    /// Returns `true` for every conditional or unconditional branch.
    pub fn is_branch(&self) -> bool {
        self.condition().is_some()
    }

    /// The condition tested by a branch mnemonic, `None` for everything else.
    pub fn condition(&self) -> Option<Condition> {
        use Condition::*;
        use Mnemonic::*;

        let condition = match self {
            B | Bl => Always,
            Beq | Bleq => Equal,
            Bne | Blne => NotEqual,
            Bcs | Blcs => CarrySet,
            Bcc | Blcc => CarryClear,
            Bmi | Blmi => Minus,
            Bpl | Blpl => Plus,
            Bvs | Blvs => OverflowSet,
            Bvc | Blvc => OverflowClear,
            Bhi | Blhi => Higher,
            Bls | Blls => LowerOrSame,
            Bge | Blge => GreaterOrEqual,
            Blt | Bllt => LessThan,
            Bgt | Blgt => GreaterThan,
            Ble | Blle => LessOrEqual,
            _ => return None,
        };

        Some(condition)
    }
}

impl Code for Mnemonic {
    const INVALID: Mnemonic = Mnemonic::Invalid;
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a numeric discriminant or a name does not denote a mnemonic.
#[derive(Clone, Debug, PartialEq)]
pub enum UnknownMnemonic {
    Code(i32),
    Name(String),
}

impl fmt::Display for UnknownMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnknownMnemonic::Code(code) => write!(f, "unknown mnemonic code {}", code),
            UnknownMnemonic::Name(name) => write!(f, "unknown mnemonic '{}'", name),
        }
    }
}

impl std::error::Error for UnknownMnemonic {}

impl TryFrom<i32> for Mnemonic {
    type Error = UnknownMnemonic;

    fn try_from(code: i32) -> Result<Mnemonic, UnknownMnemonic> {
        if code == 0 {
            return Ok(Mnemonic::Invalid);
        }

        usize::try_from(code)
            .ok()
            .and_then(|index| Mnemonic::ALL.get(index - 1))
            .copied()
            .ok_or(UnknownMnemonic::Code(code))
    }
}

impl FromStr for Mnemonic {
    type Err = UnknownMnemonic;

    /// Resolves `name` through the builtin table. The match is exact and case sensitive.
    fn from_str(name: &str) -> Result<Mnemonic, UnknownMnemonic> {
        match crate::resolver::resolve_str(name) {
            Mnemonic::Invalid => Err(UnknownMnemonic::Name(name.to_string())),
            mnemonic => Ok(mnemonic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_declaration_order() {
        assert_eq!(Mnemonic::Invalid.code(), 0);
        assert_eq!(Mnemonic::ALL.len(), 82);

        for (index, mnemonic) in Mnemonic::ALL.iter().enumerate() {
            assert_eq!(mnemonic.code(), index as i32 + 1);
            assert_eq!(Mnemonic::try_from(mnemonic.code()), Ok(*mnemonic));
        }
    }

    #[test]
    fn test_try_from_out_of_range() {
        assert_eq!(Mnemonic::try_from(0), Ok(Mnemonic::Invalid));
        assert_eq!(Mnemonic::try_from(83), Err(UnknownMnemonic::Code(83)));
        assert_eq!(Mnemonic::try_from(-1), Err(UnknownMnemonic::Code(-1)));
    }

    #[test]
    fn test_branch_metadata() {
        assert_eq!(Mnemonic::B.condition(), Some(Condition::Always));
        assert_eq!(Mnemonic::Blgt.condition(), Some(Condition::GreaterThan));
        assert_eq!(Mnemonic::Ble.condition(), Some(Condition::LessOrEqual));
        assert_eq!(Mnemonic::Add.condition(), None);

        assert!(Mnemonic::Bl.is_link());
        assert!(Mnemonic::Blle.is_link());
        assert!(Mnemonic::Blls.is_link());
        assert!(!Mnemonic::Ble.is_link());
        assert!(!Mnemonic::Bls.is_link());
        assert!(!Mnemonic::Blt.is_link());
        assert!(!Mnemonic::B.is_link());
        assert!(!Mnemonic::Mov.is_branch());
    }

    #[test]
    fn test_branch_texts_match_conditions() {
        for mnemonic in Mnemonic::ALL.iter().filter(|m| m.is_branch()) {
            let suffix = mnemonic.condition().map(|c| c.suffix()).unwrap_or("");
            let prefix = if mnemonic.is_link() { "bl" } else { "b" };

            assert_eq!(mnemonic.as_str(), format!("{}{}", prefix, suffix));
        }
    }

    #[test]
    fn test_directives() {
        let directives: Vec<_> = Mnemonic::ALL.iter().filter(|m| m.is_directive()).collect();

        assert_eq!(directives.len(), 5);
        assert!(!Mnemonic::Addr.is_directive());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ldsh".parse::<Mnemonic>(), Ok(Mnemonic::Ldsh));
        assert_eq!(
            "LDSH".parse::<Mnemonic>(),
            Err(UnknownMnemonic::Name("LDSH".to_string()))
        );
        assert!("invalid".parse::<Mnemonic>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Mnemonic::Ascii.to_string(), "ascii");
        assert_eq!(Mnemonic::M32.to_string(), "m32");
    }
}
