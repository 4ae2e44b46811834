/// Implements the std::Convert::From<u8> trait for an enum deriving FromPrimitive. Used for the
/// typed fields of a microinstruction, whose widths make every value representable.
macro_rules! from_u8 {
    ($x:ident) => {
        impl core::convert::From<u8> for $x {
            fn from(value: u8) -> $x {
                num_traits::FromPrimitive::from_u8(value).unwrap_or_else(|| {
                    panic!(
                        "Tried to create {} from invalid u8: {}",
                        stringify!($x),
                        value
                    )
                })
            }
        }
    };
}

/// Truncates any integer to the 16-bit width of the datapath.
#[inline]
pub fn mask_16bit(value: i32) -> u16 {
    (value & 0xFFFF) as u16
}

#[inline]
pub fn is_bit_set(value: u16, bit: u32) -> bool {
    (value & (1 << bit)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_16bit() {
        assert_eq!(mask_16bit(0xABCDE), 0xBCDE);
        assert_eq!(mask_16bit(-1), 0xFFFF);
        assert_eq!(mask_16bit(0x1_0000), 0);
    }

    #[test]
    fn test_is_bit_set() {
        assert!(is_bit_set(0x8000, 15));
        assert!(!is_bit_set(0x7FFF, 15));
    }
}
