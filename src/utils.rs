use std::time::Duration;

use crate::engine::{validate_tiles, BoardSize, Tile};
use crate::error::{Error, Result};

/// Parses a flat tile list such as `"1,2,3,4,0,5,6,7,8"`.
///
/// Tokens may be separated by commas, whitespace or both. The result is not
/// checked against a board size; pass it to [`validate_tiles`] or a node
/// constructor for that.
///
/// # Errors
/// Returns [`Error::InvalidTileToken`] (row 0) for a token that is not a tile number.
pub fn parse_tiles(s: &str) -> Result<Vec<Tile>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| parse_token(token, 0))
        .collect()
}

fn parse_token(token: &str, row: usize) -> Result<Tile> {
    match token {
        "." => Ok(0),
        _ => token.parse::<Tile>().map_err(|_| Error::InvalidTileToken {
            token: token.to_string(),
            row,
        }),
    }
}

/// Parses a board given as rows of whitespace-separated tile numbers.
///
/// Each string slice is one row, top to bottom. The blank may be written as `0`
/// or `.`. The board's width is taken from the first row and every row must
/// have the same length.
///
/// # Arguments
/// * `rows`: A slice of string slices (`&[&str]`), one per board row.
///
/// # Returns
/// * `Ok((BoardSize, Vec<Tile>))` with the dimensions and the flattened tiles.
/// * `Err(Error)` if a token is not a number, the rows are ragged, the board is
///   smaller than 2x2, or the tiles are not a permutation of `0..width*height`.
///
/// # Examples
/// ```
/// use sliding_puzzle::utils::board_from_str_array;
///
/// let rows = [
///     "1 2 3",
///     "4 . 5",
/// ];
/// let (size, tiles) = board_from_str_array(&rows).unwrap();
/// assert_eq!((size.width(), size.height()), (3, 2));
/// assert_eq!(tiles, vec![1, 2, 3, 4, 0, 5]);
///
/// assert!(board_from_str_array(&["1 2", "3 x"]).is_err());
/// assert!(board_from_str_array(&["1 2 3", "0 4"]).is_err());
/// ```
pub fn board_from_str_array(rows: &[&str]) -> Result<(BoardSize, Vec<Tile>)> {
    let parsed = rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.split_whitespace()
                .map(|token| parse_token(token, r))
                .collect::<Result<Vec<Tile>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let width = parsed.first().map_or(0, Vec::len);
    let ragged = parsed
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != width);
    if let Some((row, cells)) = ragged {
        return Err(Error::RaggedRow {
            row,
            expected: width,
            got: cells.len(),
        });
    }

    let size = BoardSize::new(width, rows.len())?;
    let tiles = parsed.concat();
    validate_tiles(size, &tiles)?;
    Ok((size, tiles))
}

/// Formats a solve duration the way the solver reports it.
///
/// Durations under an hour print as `mm:ss,SSS`; longer ones drop the
/// milliseconds and print as `hh:mm:ss`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use sliding_puzzle::utils::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(61_005)), "01:01,005");
/// assert_eq!(format_duration(Duration::from_secs(3_725)), "01:02:05");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    if total_secs < 60 * 60 {
        format!(
            "{:02}:{:02},{:03}",
            minutes,
            seconds,
            duration.subsec_millis()
        )
    } else {
        format!("{:02}:{:02}:{:02}", total_secs / 3600, minutes, seconds)
    }
}
