use crate::data::Database;
use crate::error::{CoreError, Result};
use std::fmt;
use tracing::{error, info};

const CREATE_CONTINENTS: &str = "
CREATE TABLE IF NOT EXISTS continents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(100) NOT NULL UNIQUE
);";

const INSERT_CONTINENTS: &str = "
INSERT INTO continents (name) VALUES
    ('Africa'),
    ('Antarctica'),
    ('Asia'),
    ('Europe'),
    ('North America'),
    ('Australia'),
    ('South America')
ON CONFLICT (name) DO NOTHING;";

const SELECT_CONTINENTS: &str = "SELECT * FROM continents;";

const CREATE_COUNTRIES: &str = "
CREATE TABLE IF NOT EXISTS Country (
    ID INT PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    size FLOAT,
    main_language VARCHAR(100),
    capital VARCHAR(100),
    population BIGINT,
    continent_id INT,
    FOREIGN KEY (continent_id) REFERENCES continents(id)
);";

const INSERT_COUNTRIES: &str = "
INSERT INTO Country (ID, name, size, main_language, capital, population, continent_id) VALUES
    (1, 'United States', 9833517, 'English', 'Washington D.C.', 331002651, 5),
    (2, 'Canada', 9984670, 'English/French', 'Ottawa', 37742154, 5),
    (3, 'Mexico', 1964375, 'Spanish', 'Mexico City', 128932753, 5),
    (4, 'Japan', 377975, 'Japanese', 'Tokyo', 126476461, 3),
    (5, 'Germany', 357022, 'German', 'Berlin', 83783942, 4),
    (6, 'France', 551695, 'French', 'Paris', 65273511, 4),
    (7, 'Brazil', 8515767, 'Portuguese', 'Brasilia', 212559417, 7),
    (8, 'Argentina', 2780400, 'Spanish', 'Buenos Aires', 45195777, 7),
    (9, 'Australia', 7692024, 'English', 'Canberra', 25499884, 6),
    (10, 'South Africa', 1219090, 'Afrikaans/English/Zulu/Xhosa', 'Cape Town', 59308690, 1)
ON CONFLICT (ID) DO NOTHING;";

/// One table-creation step of the seed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStep {
    Continents,
    Countries,
    City,
    Airport,
    Place,
}

impl SeedStep {
    /// Steps in the order they must run.
    pub const SEQUENCE: [SeedStep; 5] = [
        SeedStep::Continents,
        SeedStep::Countries,
        SeedStep::City,
        SeedStep::Airport,
        SeedStep::Place,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeedStep::Continents => "continents",
            SeedStep::Countries => "countries",
            SeedStep::City => "city",
            SeedStep::Airport => "airport",
            SeedStep::Place => "place",
        }
    }

    /// Statements run for this step, in order. Empty for steps with no schema yet.
    pub fn statements(&self) -> &'static [&'static str] {
        match self {
            SeedStep::Continents => &[CREATE_CONTINENTS, INSERT_CONTINENTS, SELECT_CONTINENTS],
            SeedStep::Countries => &[CREATE_COUNTRIES, INSERT_COUNTRIES],
            SeedStep::City | SeedStep::Airport | SeedStep::Place => &[],
        }
    }

    fn run(&self, db: &Database) -> Result<()> {
        for statement in self.statements() {
            db.execute_query(statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for SeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs every seed step in order. The first failing step stops the sequence.
pub fn seed_database(db: &Database) -> Result<()> {
    run_steps(db, &SeedStep::SEQUENCE)
}

/// Runs the given steps in order, stopping at the first failure.
pub fn run_steps(db: &Database, steps: &[SeedStep]) -> Result<()> {
    for step in steps {
        if let Err(e) = step.run(db) {
            error!("Error creating {} table: {}", step, e);
            return Err(CoreError::Seed {
                step: *step,
                source: Box::new(e),
            });
        }
        if step.statements().is_empty() {
            info!("{} step has no schema, skipped", step);
        } else {
            info!("{} table created and populated successfully", step);
        }
    }
    Ok(())
}
