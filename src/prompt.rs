//! Interactive collection of search parameters. Invalid input is answered
//! with a hint and the question is asked again; only end of input is an error.

use std::io::{self, BufRead, Write};

use crate::models::{FuelType, GearboxType, SearchQuery, MAX_YEAR, MIN_YEAR};
use crate::Result;

/// Search parameters that may or may not have been given up front.
#[derive(Debug, Clone, Default)]
pub struct PartialQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub fuel: Option<FuelType>,
    pub gearbox: Option<GearboxType>,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn hint(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    pub fn text(&mut self, question: &str, what: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.hint(&format!("Please enter a valid {}.", what))?;
        }
    }

    pub fn year(&mut self, question: &str, min: i32, max: i32) -> io::Result<i32> {
        loop {
            match self.ask(question)?.parse::<i32>() {
                Ok(year) if (min..=max).contains(&year) => return Ok(year),
                Ok(_) => self.hint(&format!("Enter a year between {} and {}.", min, max))?,
                Err(_) => self.hint("Please enter a valid year.")?,
            }
        }
    }

    pub fn fuel(&mut self) -> io::Result<FuelType> {
        let menu = FuelType::ALL
            .iter()
            .enumerate()
            .map(|(i, fuel)| format!("{}: {}", i + 1, fuel.label()))
            .collect::<Vec<_>>()
            .join(", ");
        let question = format!("Fuel ({}): ", menu);

        loop {
            if let Some(fuel) = FuelType::from_menu_choice(&self.ask(&question)?) {
                return Ok(fuel);
            }
            self.hint("Please enter a valid fuel type.")?;
        }
    }

    pub fn gearbox(&mut self) -> io::Result<GearboxType> {
        let question = "Gearbox (1: Automatic, 2: Manual): ";
        loop {
            if let Some(gearbox) = GearboxType::from_menu_choice(&self.ask(question)?) {
                return Ok(gearbox);
            }
            self.hint("Please enter a valid gearbox type.")?;
        }
    }

    /// Asks for every missing field, then validates the full query.
    pub fn complete(&mut self, partial: PartialQuery) -> Result<SearchQuery> {
        let make = match partial.make {
            Some(make) => make,
            None => self.text("Enter make: ", "make")?,
        };
        let model = match partial.model {
            Some(model) => model,
            None => self.text("Enter model: ", "model")?,
        };
        let start_year = match partial.start_year {
            Some(year) => year,
            None => {
                // A fixed end year caps the start year so the pair stays ordered
                let max = partial.end_year.map_or(MAX_YEAR, |end| end.clamp(MIN_YEAR, MAX_YEAR));
                self.year("Enter start year: ", MIN_YEAR, max)?
            }
        };
        let end_year = match partial.end_year {
            Some(year) => year,
            None => {
                let min = start_year.clamp(MIN_YEAR, MAX_YEAR);
                self.year(&format!("Enter end year (at least {}): ", min), min, MAX_YEAR)?
            }
        };
        let fuel = match partial.fuel {
            Some(fuel) => fuel,
            None => self.fuel()?,
        };
        let gearbox = match partial.gearbox {
            Some(gearbox) => gearbox,
            None => self.gearbox()?,
        };

        SearchQuery::new(&make, &model, start_year, end_year, fuel, gearbox)
    }
}
