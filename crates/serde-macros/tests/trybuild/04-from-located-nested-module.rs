use nom::{error::ErrorKind, IResult};
use pathwire_parse_utils::Span;
use pathwire_serde_macros::LocatedError;

pub mod wire {
    pub mod inner {
        use pathwire_serde_macros::LocatedError;

        #[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
        pub enum InnerError {
            Bad,
        }
    }
}

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum TestError {
    NomError(#[from_nom] ErrorKind),
    Inner(#[from_located(module = "crate::wire")] inner::InnerError),
}

use wire::inner;

fn parse(buf: Span<'_>) -> IResult<Span<'_>, u8, LocatedTestError<'_>> {
    let err = wire::inner::LocatedInnerError::new(buf, inner::InnerError::Bad);
    Err(nom::Err::Error(err.into()))
}

fn main() {
    let span = Span::new(&[1]);
    assert_eq!(
        parse(span),
        Err(nom::Err::Error(LocatedTestError::new(
            span,
            TestError::Inner(inner::InnerError::Bad)
        )))
    );
}
