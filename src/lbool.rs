use std::ops::BitXor;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum LBool {
    False = 0,
    True = 1,
    Undef = 2,
}

impl LBool {
    #[inline]
    pub const fn is_undef(self) -> bool {
        (self as u8) > 1
    }

    #[inline]
    pub const fn is_true(self) -> bool {
        (self as u8) == 1
    }

    #[inline]
    pub const fn is_false(self) -> bool {
        (self as u8) == 0
    }
}

impl From<bool> for LBool {
    fn from(b: bool) -> Self {
        if b {
            LBool::True
        } else {
            LBool::False
        }
    }
}

// LBool ^ bool
impl BitXor<bool> for LBool {
    type Output = LBool;

    fn bitxor(self, rhs: bool) -> Self::Output {
        match self {
            LBool::Undef => LBool::Undef,

            // SAFETY: both lhs (`self as u8`) and rhs (`rhs as u8`) are 0/1,
            // so their xor is also 0/1, which is safe to transmute into LBool.
            _ => unsafe { std::mem::transmute::<u8, LBool>((self as u8) ^ (rhs as u8)) },
        }
    }
}
