use std::fmt::{Display, Formatter};
use std::ops;

use crate::var::Var;

/// A literal packed as `2*var + sign`, where `sign = 1` is the negative polarity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Lit(pub(crate) u32);

impl Lit {
    pub const fn new(var: Var, negated: bool) -> Self {
        Lit(var.0 << 1 | negated as u32)
    }

    pub const fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    pub const fn negated(self) -> bool {
        (self.0 & 1) != 0
    }

    pub const fn sign(self) -> i32 {
        if self.negated() {
            -1
        } else {
            1
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 1-based signed DIMACS form.
    pub const fn to_external(self) -> i32 {
        self.sign() * (self.var().0 + 1) as i32
    }

    pub const fn from_external(lit: i32) -> Lit {
        debug_assert!(lit != 0);
        let var = lit.unsigned_abs() - 1;
        Lit::new(Var(var), lit < 0)
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_external())
    }
}

// !Lit
impl ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

// -Lit
impl ops::Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

// Lit ^ bool
impl ops::BitXor<bool> for Lit {
    type Output = Lit;

    fn bitxor(self, rhs: bool) -> Self::Output {
        Lit(self.0 ^ rhs as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_packing() {
        let v = Var::new(3);
        let p = Lit::new(v, false);
        let n = Lit::new(v, true);
        assert_eq!(p.var(), v);
        assert_eq!(n.var(), v);
        assert!(!p.negated());
        assert!(n.negated());
        assert_eq!(!p, n);
        assert_eq!(p.index() ^ 1, n.index());
    }

    #[test]
    fn lit_external() {
        assert_eq!(Lit::from_external(5).to_external(), 5);
        assert_eq!(Lit::from_external(-5).to_external(), -5);
        assert_eq!(Lit::from_external(1).var(), Var::new(0));
        assert_eq!(Lit::from_external(-1), !Lit::from_external(1));
    }
}
