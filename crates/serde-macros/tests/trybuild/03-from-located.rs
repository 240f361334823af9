use nom::{error::ErrorKind, IResult};
use pathwire_parse_utils::Span;
use pathwire_serde_macros::LocatedError;

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum TestError {
    NomError(#[from_nom] ErrorKind),
    Inner(#[from_located(module = "self")] InnerError),
}

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum InnerError {
    Bad,
}

fn parse_inner(buf: Span<'_>) -> IResult<Span<'_>, u8, LocatedInnerError<'_>> {
    Err(nom::Err::Error(LocatedInnerError::new(buf, InnerError::Bad)))
}

fn parse(buf: Span<'_>) -> IResult<Span<'_>, u8, LocatedTestError<'_>> {
    parse_inner(buf).map_err(|err| err.map(Into::into))
}

fn main() {
    let span = Span::new(&[1]);
    assert_eq!(
        parse(span),
        Err(nom::Err::Error(LocatedTestError::new(
            span,
            TestError::Inner(InnerError::Bad)
        )))
    );
}
