use nom::{combinator::map_res, error::ErrorKind, number::complete::be_u8, IResult};
use pathwire_parse_utils::Span;
use pathwire_serde_macros::LocatedError;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct UndefinedCode(pub u8);

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum TestError {
    NomError(#[from_nom] ErrorKind),
    UndefinedCode(#[from_external] UndefinedCode),
}

fn code(value: u8) -> Result<u8, UndefinedCode> {
    if value < 10 {
        Ok(value)
    } else {
        Err(UndefinedCode(value))
    }
}

fn parse(buf: Span<'_>) -> IResult<Span<'_>, u8, LocatedTestError<'_>> {
    map_res(be_u8, code)(buf)
}

fn main() {
    let buf = [11u8];
    let span = Span::new(&buf);
    assert_eq!(
        parse(span),
        Err(nom::Err::Error(LocatedTestError::new(
            span,
            TestError::UndefinedCode(UndefinedCode(11))
        )))
    );
}
