use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, separated};
use winnow::error::{ErrMode, ModalResult, ParserError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

// -- Whitespace --------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

// -- Numbers -----------------------------------------------------------------

fn digits(count: usize) -> impl FnMut(&mut &str) -> ModalResult<u32> {
    move |input: &mut &str| {
        take_while(count, |c: char| c.is_ascii_digit())
            .try_map(str::parse::<u32>)
            .parse_next(input)
    }
}

// -- Dates -------------------------------------------------------------------

fn calendar_date(input: &mut &str) -> ModalResult<NaiveDate> {
    let (year, _, month, _, day) = (
        digits(4).context(StrContext::Expected(StrContextValue::Description("year"))),
        '-',
        cut_err(digits(2)).context(StrContext::Expected(StrContextValue::Description("month"))),
        cut_err('-'),
        cut_err(digits(2)).context(StrContext::Expected(StrContextValue::Description("day"))),
    )
        .parse_next(input)?;
    let year = i32::try_from(year).map_err(|_| ErrMode::from_input(input).cut())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ErrMode::from_input(input).cut())
}

fn time_of_day(input: &mut &str) -> ModalResult<NaiveTime> {
    let (hour, _, minute, second) = (
        digits(2),
        ':',
        cut_err(digits(2)),
        opt(preceded(':', cut_err(digits(2)))),
    )
        .parse_next(input)?;
    NaiveTime::from_hms_opt(hour, minute, second.unwrap_or(0))
        .ok_or_else(|| ErrMode::from_input(input).cut())
}

fn date_time(input: &mut &str) -> ModalResult<NaiveDateTime> {
    let date = calendar_date(input)?;
    let time = opt(preceded(alt(('T', ' ')), time_of_day))
        .context(StrContext::Expected(StrContextValue::Description(
            "time of day",
        )))
        .parse_next(input)?;
    Ok(date.and_time(time.unwrap_or(NaiveTime::MIN)))
}

pub(super) fn date_param(input: &mut &str) -> ModalResult<NaiveDateTime> {
    delimited(ws, date_time, ws).parse_next(input)
}

// -- Comma lists -------------------------------------------------------------

pub(super) fn comma_list(input: &mut &str) -> ModalResult<Vec<String>> {
    let items: Vec<&str> = separated(0.., take_till(0.., ','), ',').parse_next(input)?;
    Ok(items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect())
}
