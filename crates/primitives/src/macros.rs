/// Implements conversions and formatting for a newtype wrapping one of the
/// `Buf*` types, so id types elsewhere don't have to repeat them.
#[macro_export]
macro_rules! impl_buf_wrapper {
    ($wrapper:ident, $name:ident, $len:expr) => {
        impl ::std::convert::From<$name> for $wrapper {
            fn from(value: $name) -> Self {
                Self(value)
            }
        }

        impl ::std::convert::From<$wrapper> for $name {
            fn from(value: $wrapper) -> Self {
                value.0
            }
        }

        impl ::std::convert::From<[u8; $len]> for $wrapper {
            fn from(value: [u8; $len]) -> Self {
                Self($name::from(value))
            }
        }

        impl ::std::convert::AsRef<[u8; $len]> for $wrapper {
            fn as_ref(&self) -> &[u8; $len] {
                self.0.as_ref()
            }
        }

        impl $wrapper {
            pub fn inner(&self) -> &$name {
                &self.0
            }

            pub fn zero() -> Self {
                Self($name::zero())
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }
        }

        impl ::core::fmt::Debug for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(&self.0, f)
            }
        }

        impl ::core::fmt::Display for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl<'a> ::arbitrary::Arbitrary<'a> for $wrapper {
            fn arbitrary(u: &mut ::arbitrary::Unstructured<'a>) -> ::arbitrary::Result<Self> {
                Ok(Self($name::arbitrary(u)?))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::buf::Buf32;

    #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
    struct TestId(Buf32);

    crate::impl_buf_wrapper!(TestId, Buf32, 32);

    #[test]
    fn test_wrapper_delegates_to_buf() {
        let id = TestId::from([0x5au8; 32]);
        assert_eq!(*id.inner(), Buf32::from([0x5au8; 32]));
        assert!(!id.is_zero());
        assert!(TestId::zero().is_zero());
    }

    #[test]
    fn test_wrapper_formats_like_buf() {
        let id = TestId::from([0x5au8; 32]);
        assert_eq!(format!("{id}"), format!("{}", id.inner()));
        assert_eq!(format!("{id:?}"), format!("{:?}", id.inner()));
    }

    #[test]
    fn test_wrapper_unwraps_to_buf() {
        let id = TestId::from([9u8; 32]);
        let buf: Buf32 = id.into();
        assert_eq!(buf, Buf32::from([9u8; 32]));
    }
}
