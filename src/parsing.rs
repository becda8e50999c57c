use nom::{
    character::complete::{i32, space1, u32},
    number::complete::double,
    sequence::preceded,
    IResult,
};

pub(crate) fn double_entry(line: &str) -> IResult<&str, f64> {
    preceded(space1, double)(line)
}

pub(crate) fn u32_entry(line: &str) -> IResult<&str, u32> {
    preceded(space1, u32)(line)
}

pub(crate) fn i32_entry(line: &str) -> IResult<&str, i32> {
    preceded(space1, i32)(line)
}
