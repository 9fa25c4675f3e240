//! Ion 1.0 binary constants.

/// Ion Binary Version Marker for Ion 1.0.
pub const ION_BVM: [u8; 4] = [0xe0, 0x01, 0x00, 0xea];

/// Type IDs (high nibble of a type descriptor byte).
pub struct Type;

impl Type {
    pub const NULL: u8 = 0x0;
    pub const BOOL: u8 = 0x1;
    pub const UINT: u8 = 0x2;
    pub const NINT: u8 = 0x3;
    pub const FLOT: u8 = 0x4;
    pub const DECI: u8 = 0x5;
    pub const TIME: u8 = 0x6;
    pub const SYMB: u8 = 0x7;
    pub const STRI: u8 = 0x8;
    pub const CLOB: u8 = 0x9;
    pub const BINA: u8 = 0xa;
    pub const LIST: u8 = 0xb;
    pub const SEXP: u8 = 0xc;
    pub const STRU: u8 = 0xd;
    pub const ANNO: u8 = 0xe;
}

/// Type IDs shifted into the high nibble, ready to be OR-ed with a length.
pub struct TypeOverlay;

impl TypeOverlay {
    pub const NULL: u8 = 0x00;
    pub const BOOL: u8 = 0x10;
    pub const UINT: u8 = 0x20;
    pub const NINT: u8 = 0x30;
    pub const FLOT: u8 = 0x40;
    pub const DECI: u8 = 0x50;
    pub const TIME: u8 = 0x60;
    pub const SYMB: u8 = 0x70;
    pub const STRI: u8 = 0x80;
    pub const BINA: u8 = 0xa0;
    pub const LIST: u8 = 0xb0;
    pub const SEXP: u8 = 0xc0;
    pub const STRU: u8 = 0xd0;
    pub const ANNO: u8 = 0xe0;
}

/// Length nibble meaning "a VarUInt length follows".
pub const LEN_VAR: u8 = 14;

/// Length nibble meaning "typed null".
pub const LEN_NULL: u8 = 15;

/// Deepest container nesting either reader accepts.
pub const MAX_DEPTH: usize = 128;

/// Ion 1.0 system symbol table. Slot 0 is the unknown-text symbol `$0`.
pub const SYSTEM_SYMBOLS: [&str; 10] = [
    "",
    "$ion",
    "$ion_1_0",
    "$ion_symbol_table",
    "name",
    "version",
    "imports",
    "symbols",
    "max_id",
    "$ion_shared_symbol_table",
];

pub const SID_ION_SYMBOL_TABLE: u32 = 3;
pub const SID_SYMBOLS: u32 = 7;
