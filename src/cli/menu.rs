//! Interactive menu session

use std::{
    borrow::Cow,
    io::{self, BufRead, Write},
};

use log::{debug, info, warn};

use crate::{
    domain::record::{Record, parse_id},
    storage::{error::StorageError, gateway::PersistenceGateway, store::RecordStore},
};

const MENU: &str = "Menu

[l] load Inventory from file
[a] Add CD
[i] Display Current Inventory
[d] delete CD from Inventory
[s] Save Inventory to file
[x] exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Load,
    Add,
    List,
    Delete,
    Save,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "l" => Some(Self::Load),
            "a" => Some(Self::Add),
            "i" => Some(Self::List),
            "d" => Some(Self::Delete),
            "s" => Some(Self::Save),
            "x" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Whether the menu loop goes on after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Writes the inventory table
pub fn write_inventory<W: Write>(out: &mut W, records: &[Record]) -> io::Result<()> {
    writeln!(out, "======= The Current Inventory: =======")?;
    writeln!(out, "ID\tCD Title (by: Artist)\n")?;
    for record in records {
        writeln!(out, "{record}")?;
    }
    writeln!(out, "======================================")
}

/// One run of the menu, owning the working inventory
///
/// Reads user answers from `input` and writes everything shown to the user
/// to `output`. Only failures of those two streams end a session early.
pub struct Session<R, W> {
    store: RecordStore,
    gateway: PersistenceGateway,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(gateway: PersistenceGateway, input: R, output: W) -> Self {
        Self {
            store: RecordStore::new(),
            gateway,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Loads the saved inventory, then serves menu commands until exit
    pub fn run(&mut self) -> io::Result<()> {
        self.load_on_startup()?;

        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.menu_choice()? else {
                break;
            };
            writeln!(self.output)?;
            debug!("menu choice {choice:?}");

            let flow = match choice {
                MenuChoice::Exit => Flow::Exit,
                MenuChoice::Load => self.reload()?,
                MenuChoice::Add => self.add()?,
                MenuChoice::List => {
                    self.show_inventory()?;
                    Flow::Continue
                }
                MenuChoice::Delete => self.delete()?,
                MenuChoice::Save => self.save()?,
            };

            if flow == Flow::Exit {
                break;
            }
        }

        info!("session ended with {} records in memory", self.store.len());
        Ok(())
    }

    fn load_on_startup(&mut self) -> io::Result<()> {
        match self.gateway.load() {
            Ok(records) => {
                self.store.replace(records);
            }
            Err(StorageError::FileNotFound { .. }) => {
                writeln!(
                    self.output,
                    "No such CD Inventory file exists, please enter CD info and save\n"
                )?;
            }
            Err(e @ StorageError::EmptyOrCorrupt { .. }) => {
                warn!("{e}");
                writeln!(
                    self.output,
                    "Empty or unreadable CD Inventory file, please enter CD Inventory to be saved\n"
                )?;
            }
            Err(e) => {
                warn!("{e}");
                writeln!(self.output, "Could not read the CD Inventory file: {e}\n")?;
            }
        }
        Ok(())
    }

    /// prompts until one of the menu keys is entered, `None` on end of input
    fn menu_choice(&mut self) -> io::Result<Option<MenuChoice>> {
        loop {
            let Some(answer) =
                self.prompt("Which operation would you like to perform? [l, a, i, d, s or x]: ")?
            else {
                return Ok(None);
            };
            if let Some(choice) = MenuChoice::parse(&answer) {
                return Ok(Some(choice));
            }
        }
    }

    fn reload(&mut self) -> io::Result<Flow> {
        writeln!(
            self.output,
            "WARNING: If you continue, all unsaved data will be lost and the Inventory re-loaded from file."
        )?;
        let Some(answer) = self.prompt(
            "type 'yes' to continue and reload from file. otherwise reload will be canceled: ",
        )?
        else {
            return Ok(Flow::Exit);
        };

        if answer.to_lowercase() == "yes" {
            writeln!(self.output, "reloading...")?;
            match self.gateway.load() {
                Ok(records) => self.store.replace(records),
                Err(StorageError::FileNotFound { .. }) => {
                    writeln!(
                        self.output,
                        "\nFile not found: The CD Inventory file does not exist!\n"
                    )?;
                }
                Err(e @ StorageError::EmptyOrCorrupt { .. }) => {
                    warn!("{e}");
                    writeln!(
                        self.output,
                        "\nThe CD Inventory file is empty or corrupt, inventory NOT reloaded.\n"
                    )?;
                }
                Err(e) => {
                    warn!("{e}");
                    writeln!(self.output, "\nCould not reload the inventory: {e}\n")?;
                }
            }
        } else if self
            .prompt(
                "canceling... Inventory data NOT reloaded. Press [ENTER] to continue to the menu.",
            )?
            .is_none()
        {
            return Ok(Flow::Exit);
        }

        self.show_inventory()?;
        Ok(Flow::Continue)
    }

    fn add(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt("Enter ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(title) = self.prompt("What is the CD's title? ")? else {
            return Ok(Flow::Exit);
        };
        let Some(artist) = self.prompt("What is the Artist's name? ")? else {
            return Ok(Flow::Exit);
        };

        match parse_id(&id) {
            Ok(id) => {
                let record = Record::new(id, title, artist);
                info!("adding CD {record}");
                self.store.add(record);
            }
            Err(e) => {
                writeln!(self.output, "\n{e}, please try again!\n")?;
            }
        }

        self.show_inventory()?;
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        self.show_inventory()?;
        let Some(answer) = self.prompt("Which ID would you like to delete? ")? else {
            return Ok(Flow::Exit);
        };

        match parse_id(&answer) {
            Ok(id) => {
                if self.store.remove(id) {
                    info!("removed CD with id {id}");
                    writeln!(self.output, "The CD was removed")?;
                } else {
                    writeln!(self.output, "Could not find this CD!")?;
                }
            }
            Err(e) => {
                writeln!(self.output, "\n{e}, please try again!\n")?;
            }
        }

        self.show_inventory()?;
        Ok(Flow::Continue)
    }

    fn save(&mut self) -> io::Result<Flow> {
        self.show_inventory()?;
        let Some(answer) = self.prompt("Save this inventory to file? [y/n] ")? else {
            return Ok(Flow::Exit);
        };

        if answer.to_lowercase() == "y" {
            match self.gateway.save(self.store.snapshot()) {
                Ok(()) => {
                    writeln!(
                        self.output,
                        "Inventory saved to {}.",
                        self.gateway.path().display()
                    )?;
                }
                Err(e) => {
                    warn!("{e}");
                    writeln!(self.output, "The inventory could not be saved: {e}")?;
                }
            }
        } else if self
            .prompt("The inventory was NOT saved to file. Press [ENTER] to return to the menu.")?
            .is_none()
        {
            return Ok(Flow::Exit);
        }

        Ok(Flow::Continue)
    }

    fn show_inventory(&mut self) -> io::Result<()> {
        write_inventory(&mut self.output, self.store.snapshot())
    }

    /// writes `text` and reads one trimmed line, `None` on end of input
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            debug!("end of input");
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        if matches!(line, Cow::Owned(_)) {
            debug!("replaced invalid UTF-8 in input line");
        }
        Ok(Some(line.trim().to_string()))
    }
}
