//! Interactive console
//!
//! Reads whitespace-separated numbers from any `BufRead` and writes prompts
//! and reports to any `Write`, so the menu can be driven from a terminal or
//! from a test buffer.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use banker::{ConfigError, Denial, LedgerConfig, Limits, Outcome, ProcessId, System, Units};

/// Menu choices
const MENU_REQUEST: i64 = 1;
const MENU_PRINT: i64 = 2;
const MENU_EXIT: i64 = 0;

pub struct Console<R, W> {
    input: R,
    output: W,
    tokens: VecDeque<String>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            tokens: VecDeque::new(),
        }
    }

    /// Consume the console, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Next whitespace-separated token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<String>> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read input")?;
            if read == 0 {
                return Ok(None);
            }
            self.tokens
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.tokens.pop_front())
    }

    /// Prompt until an integer is entered. End of input is an error.
    fn read_int(&mut self, prompt: &str) -> Result<i64> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let Some(token) = self.next_token()? else {
                bail!("unexpected end of input");
            };
            match token.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "'{}' is not a number, try again.", token)?,
            }
        }
    }

    /// Prompt until a non-negative unit count is entered.
    fn read_units(&mut self, prompt: &str) -> Result<Units> {
        loop {
            let value = self.read_int(prompt)?;
            match Units::try_from(value) {
                Ok(units) => return Ok(units),
                Err(_) => writeln!(self.output, "Units must be between 0 and {}.", Units::MAX)?,
            }
        }
    }

    /// Prompt for a dimension and check it against `[1, limit]`.
    fn read_dimension(
        &mut self,
        prompt: &str,
        limit: usize,
        empty: ConfigError,
        too_many: fn(usize, usize) -> ConfigError,
    ) -> Result<usize> {
        let value = self.read_int(prompt)?;
        if value <= 0 {
            return Err(empty.into());
        }
        let count = usize::try_from(value)?;
        if count > limit {
            return Err(too_many(count, limit).into());
        }
        Ok(count)
    }

    /// Prompt for the whole initial state, the way the classic simulator does.
    pub fn read_config(&mut self, limits: Limits) -> Result<LedgerConfig> {
        writeln!(self.output, "=========== Banker's Algorithm ===========")?;

        let n = self.read_dimension(
            &format!("Number of processes n (<= {}): ", limits.max_processes),
            limits.max_processes,
            ConfigError::NoProcesses,
            |count, limit| ConfigError::TooManyProcesses { count, limit },
        )?;
        let m = self.read_dimension(
            &format!("Number of resource classes m (<= {}): ", limits.max_resources),
            limits.max_resources,
            ConfigError::NoResources,
            |count, limit| ConfigError::TooManyResources { count, limit },
        )?;

        writeln!(self.output, "\nInitial Available units ({} classes):", m)?;
        let mut available = Vec::with_capacity(m);
        for j in 0..m {
            available.push(self.read_units(&format!("Available[{}] = ", j))?);
        }

        writeln!(self.output, "\nMax matrix (maximum claim per process):")?;
        let max = self.read_matrix("Max", n, m)?;

        writeln!(self.output, "\nAllocation matrix (units currently held):")?;
        let allocation = self.read_matrix("Allocation", n, m)?;

        Ok(LedgerConfig::new(available, max)
            .with_allocation(allocation)
            .with_limits(limits))
    }

    fn read_matrix(&mut self, name: &str, n: usize, m: usize) -> Result<Vec<Vec<Units>>> {
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            writeln!(self.output, "Process {}:", ProcessId(i))?;
            let mut row = Vec::with_capacity(m);
            for j in 0..m {
                row.push(self.read_units(&format!("{}[{}][{}] = ", name, i, j))?);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// Print the state tables.
    pub fn print_state(&mut self, system: &System) -> Result<()> {
        writeln!(self.output)?;
        write!(self.output, "{}", system.query_state())?;
        writeln!(self.output)?;
        Ok(())
    }

    /// Print the safety verdict on the committed state.
    pub fn print_safety(&mut self, system: &System, label: &str) -> Result<bool> {
        let report = system.check_safety();
        if report.is_safe() {
            writeln!(self.output, "{} is safe.", label)?;
            writeln!(self.output, "Safe sequence: {}\n", report.sequence())?;
        } else {
            writeln!(self.output, "Warning: {} is already unsafe!\n", label)?;
        }
        Ok(report.is_safe())
    }

    /// Report the outcome of one request.
    pub fn print_outcome(&mut self, system: &System, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::Granted { sequence } => {
                writeln!(self.output, "The system stays safe; request granted.")?;
                writeln!(self.output, "Safe sequence: {}", sequence)?;
                self.print_state(system)?;
            }
            Outcome::Denied(denial @ Denial::Unsafe { .. }) => {
                writeln!(self.output, "Warning: {}. Request denied!", denial)?;
                writeln!(self.output, "State rolled back to before the request:")?;
                self.print_state(system)?;
            }
            Outcome::Denied(denial @ Denial::ExceedsClaim { .. }) => {
                writeln!(self.output, "Illegal request: {}", denial)?;
                writeln!(
                    self.output,
                    "Reason: the process asked for more than its remaining maximum need.\n"
                )?;
            }
            Outcome::Denied(denial @ Denial::InsufficientResources { .. }) => {
                writeln!(self.output, "Request cannot be met yet: {}", denial)?;
                writeln!(
                    self.output,
                    "Reason: not enough free units right now; try again later.\n"
                )?;
            }
            Outcome::Denied(denial) => {
                writeln!(self.output, "Request rejected: {}\n", denial)?;
            }
        }
        Ok(())
    }

    /// Prompt for and submit one request. A negative process index cancels.
    fn handle_request(&mut self, system: &mut System) -> Result<()> {
        let n = system.ledger().processes();
        let m = system.ledger().resources();

        let p = self.read_int(&format!(
            "Requesting process p (0 ~ {}, negative to cancel): ",
            n - 1
        ))?;
        if p < 0 {
            writeln!(self.output, "Request cancelled.\n")?;
            return Ok(());
        }

        let pid = ProcessId(usize::try_from(p)?);

        writeln!(self.output, "Request vector for {} ({} classes):", pid, m)?;
        let mut units = Vec::with_capacity(m);
        for j in 0..m {
            units.push(self.read_units(&format!("Request[{}] = ", j))?);
        }

        let outcome = system.request(pid, &units);
        self.print_outcome(system, &outcome)
    }

    /// Run the request menu until the user exits or input ends.
    pub fn run_menu(&mut self, system: &mut System) -> Result<()> {
        loop {
            writeln!(self.output, "========== Menu ==========")?;
            writeln!(self.output, "{}. Issue a resource request", MENU_REQUEST)?;
            writeln!(self.output, "{}. Print current system state", MENU_PRINT)?;
            writeln!(self.output, "{}. Exit", MENU_EXIT)?;
            write!(self.output, "Choice: ")?;
            self.output.flush()?;

            let Some(token) = self.next_token()? else {
                writeln!(self.output)?;
                return Ok(());
            };

            match token.parse::<i64>() {
                Ok(MENU_REQUEST) => self.handle_request(system)?,
                Ok(MENU_PRINT) => self.print_state(system)?,
                Ok(MENU_EXIT) => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice, please try again.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker::scenario::textbook;
    use banker::Verdict;
    use std::io::Cursor;

    fn run(system: &mut System, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.to_owned()), Vec::new());
        console.run_menu(system).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_read_config_textbook() {
        let script = "5 3\n3 3 2\n\
                      7 5 3  3 2 2  9 0 2  2 2 2  4 3 3\n\
                      0 1 0  2 0 0  3 0 2  2 1 1  0 0 2\n";
        let mut console = Console::new(Cursor::new(script), Vec::new());

        let config = console.read_config(Limits::default()).unwrap();
        assert_eq!(config, textbook());
    }

    #[test]
    fn test_read_config_rejects_too_many_processes() {
        let mut console = Console::new(Cursor::new("11\n"), Vec::new());
        let err = console.read_config(Limits::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::TooManyProcesses {
                count: 11,
                limit: 10
            })
        );
    }

    #[test]
    fn test_read_config_rejects_zero_classes() {
        let mut console = Console::new(Cursor::new("2 0\n"), Vec::new());
        let err = console.read_config(Limits::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::NoResources)
        );
    }

    #[test]
    fn test_read_units_reprompts_on_bad_input() {
        let mut console = Console::new(Cursor::new("x -1 4\n"), Vec::new());
        assert_eq!(console.read_units("> ").unwrap(), 4);

        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("'x' is not a number"));
        assert!(out.contains("Units must be between 0"));
    }

    #[test]
    fn test_menu_grant_then_exit() {
        let mut system = System::initialize(textbook()).unwrap();
        let out = run(&mut system, "1\n1\n1 0 2\n0\n");

        assert!(out.contains("request granted"));
        assert!(out.contains("Safe sequence: P1 -> P3 -> P4 -> P0 -> P2"));
        assert!(out.contains("Goodbye."));
        assert_eq!(system.ledger().available(), &[2, 3, 0]);
    }

    #[test]
    fn test_menu_reports_denials() {
        let mut system = System::initialize(textbook()).unwrap();
        let out = run(
            &mut system,
            "1 1 1 0 2\n1 0 0 2 0\n1 4 3 3 0\n1 1 0 3 0\n1 -1\n7\n",
        );

        assert!(out.contains("Request denied!"));
        assert!(out.contains("State rolled back"));
        assert!(out.contains("Request cannot be met yet: Request[R0] = 3 > Available[R0] = 2"));
        assert!(out.contains("Illegal request: Request[R1] = 3 > Need[P1][R1] = 2"));
        assert!(out.contains("Request cancelled."));
        assert!(out.contains("Invalid choice"));
    }

    #[test]
    fn test_menu_out_of_range_process_is_audited() {
        let mut system = System::initialize(textbook()).unwrap();
        let out = run(&mut system, "1 9 0 0 0\n0\n");

        assert!(out.contains("Request rejected: invalid process P9: ledger has 5 processes"));
        assert_eq!(system.syslog().len(), 2);
        assert_eq!(system.syslog().count_verdicts(Verdict::InvalidProcess), 1);
        assert_eq!(system.commitlog().len(), 1);
    }

    #[test]
    fn test_menu_print_state() {
        let mut system = System::initialize(textbook()).unwrap();
        let out = run(&mut system, "2\n");
        assert!(out.contains("R0:3  R1:3  R2:2"));
    }
}
