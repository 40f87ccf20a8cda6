//! Console command parsing.
//!
//! One command per line. Coordinates are `<lat> <lon>` or `<lat>,<lon>`.

use fairway_core::models::{parse_score, Coordinate};
use fairway_core::CoreError;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  signin <user> [name]        select the player whose data is loaded and saved
  signout                     forget the current player
  whoami                      show the current player
  hole <lat> <lon>            drop the pin
  distance <lat> <lon>        distance from a position to the pin
  start <lat> <lon>           start a shot
  end <lat> <lon> <club>      finish the shot with a club (name or number)
  recommend <lat> <lon>       club for the distance to the pin
  recommend --yards <n>       club for a given yardage
  score <n>                   record a round and show the handicap
  handicap                    show the handicap
  shots                       average yardage per club
  clubs                       list the bag
  save                        retry saving unsaved shots
  help                        this text
  quit                        exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SignIn {
        user: String,
        display_name: Option<String>,
    },
    SignOut,
    WhoAmI,
    Hole(Coordinate),
    Distance(Coordinate),
    Start(Coordinate),
    End {
        at: Coordinate,
        club: String,
    },
    RecommendFrom(Coordinate),
    RecommendYards(f64),
    Score(f64),
    Handicap,
    Shots,
    Clubs,
    Save,
    Help,
    Quit,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Nothing entered")]
    Empty,

    #[error("Unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Split a coordinate off the front of `args`, returning the remainder.
fn take_coordinate<'a>(args: &'a [&'a str]) -> Result<(Coordinate, &'a [&'a str]), CoreError> {
    // "45.1,-93.5" is one token, "45.1 -93.5" and "45.1, -93.5" are two
    let consumed = match args.first() {
        Some(first) if first.contains(',') && !first.ends_with(',') => 1,
        _ => 2,
    };
    let consumed = consumed.min(args.len());
    let at = Coordinate::parse(&args[..consumed])?;
    Ok((at, &args[consumed..]))
}

fn coordinate_only(args: &[&str], usage: &'static str) -> Result<Coordinate, ParseError> {
    let (at, rest) = take_coordinate(args).map_err(|_| ParseError::Usage(usage))?;
    if !rest.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Ok(at)
}

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = tokens.split_first() else {
        return Err(ParseError::Empty);
    };

    match name.to_ascii_lowercase().as_str() {
        "signin" | "login" => match args {
            [user] => Ok(Command::SignIn {
                user: user.to_string(),
                display_name: None,
            }),
            [user, name @ ..] => Ok(Command::SignIn {
                user: user.to_string(),
                display_name: Some(name.join(" ")),
            }),
            [] => Err(ParseError::Usage("signin <user> [name]")),
        },
        "signout" | "logout" => Ok(Command::SignOut),
        "whoami" => Ok(Command::WhoAmI),
        "hole" | "pin" => Ok(Command::Hole(coordinate_only(args, "hole <lat> <lon>")?)),
        "distance" | "dist" => Ok(Command::Distance(coordinate_only(
            args,
            "distance <lat> <lon>",
        )?)),
        "start" => Ok(Command::Start(coordinate_only(args, "start <lat> <lon>")?)),
        "end" => {
            const USAGE: &str = "end <lat> <lon> <club>";
            let (at, rest) = take_coordinate(args).map_err(|_| ParseError::Usage(USAGE))?;
            if rest.is_empty() {
                return Err(ParseError::Usage(USAGE));
            }
            Ok(Command::End {
                at,
                club: rest.join(" "),
            })
        }
        "recommend" | "rec" => match args {
            ["--yards", yards] => {
                let yards = yards
                    .parse::<f64>()
                    .ok()
                    .filter(|y| y.is_finite() && *y >= 0.0)
                    .ok_or(ParseError::Usage("recommend --yards <n>"))?;
                Ok(Command::RecommendYards(yards))
            }
            _ => Ok(Command::RecommendFrom(coordinate_only(
                args,
                "recommend <lat> <lon> | recommend --yards <n>",
            )?)),
        },
        "score" => match args {
            [score] => Ok(Command::Score(parse_score(score)?)),
            _ => Err(ParseError::Usage("score <n>")),
        },
        "handicap" => Ok(Command::Handicap),
        "shots" => Ok(Command::Shots),
        "clubs" => Ok(Command::Clubs),
        "save" => Ok(Command::Save),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
