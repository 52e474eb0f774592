use rand::Rng;
use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

pub const FIRST_NAMES: &[&str] = &[
    "Alex", "Noah", "Liam", "Ethan", "Lucas", "Mason", "Logan", "Aiden", "Owen", "Wyatt",
    "Carter", "Hudson", "Dylan", "Connor", "Ryan", "Nathan", "Cole", "Jaxon", "Parker", "Eli",
    "Declan", "Kieran", "Miles", "Caleb", "Roman", "Emmett", "Asher", "Levi", "Brady", "Griffin",
    "Nolan", "Sawyer", "Gavin", "Micah", "Tristan", "Julian", "Chase", "Brody", "Bennett",
    "Tobias", "Kai", "Dominic", "Sebastian", "Archer", "Damian", "Finley", "Reid", "Matteo",
    "Silas", "Jude", "Marek", "Andrei", "Nikita", "Ilya", "Viktor", "Teemu", "Mikael", "Anton",
    "Rasmus", "Ville", "Henrik", "Jesper", "Lukas", "Patrik", "Sami", "Joel", "Filip", "Elias",
    "Mikko", "Jani", "Adam", "Ben", "Brock", "Brendan", "Colton", "Devon", "Drew", "Eric",
    "Evan", "Frank", "Gabe", "Hayden", "Ian", "Jack", "Jake", "Jesse", "Jonah", "Jordan",
    "Josh", "Kasper", "Kevin", "Kristian", "Lane", "Leo", "Marc", "Mark", "Max", "Neil",
    "Nick", "Oliver", "Oscar", "Otto", "Paavo", "Pavel", "Philip", "Quentin", "Riley", "Sam",
    "Shane", "Tanner", "Taylor", "Theo", "Tommy", "Vince", "Vlad", "William", "Yuri", "Zach",
    "Zane", "Axel", "Boris", "Bryce", "Cedric", "Denis", "Dimitri", "Edvin", "Felix", "Finn",
    "Fraser", "Gordon", "Grady", "Grant", "Hugo", "Isak", "Jasper", "Jens", "Jonas", "Julius",
    "Keaton", "Kellen", "Klaus", "Kurt", "Lars", "Magnus", "Matias", "Milo", "Nico", "Nils",
    "Noel", "Odin", "Pierce", "Quincy", "Remy", "Rhett", "Ronan", "Rory", "Ruben", "Soren",
    "Sven", "Tobin", "Torin", "Troy", "Wade", "Wes", "Xavier",
];

pub const LAST_NAMES: &[&str] = &[
    "Anderson", "Bennett", "Carter", "Dalton", "Ellis", "Foster", "Graves", "Hughes", "Irwin",
    "Jensen", "Keller", "Lawson", "Morrison", "Nash", "Olsen", "Peterson", "Quinn", "Richards",
    "Sullivan", "Turner", "Underwood", "Vaughn", "Walker", "Young", "Zimmer", "Baranov",
    "Chekhov", "Dvorak", "Eriksson", "Fedorov", "Grimaldi", "Hartikainen", "Ivanov", "Johansson",
    "Kovalenko", "Lundqvist", "Novak", "Orlov", "Pavlov", "Romanov", "Soderberg", "Tarasenko",
    "Ulrich", "Volkov", "Wikstrom", "Yakovlev", "Zaitsev", "Aalto", "Bergman", "Carlsson",
    "Dahl", "Engstrom", "Franzen", "Gustafsson", "Holm", "Isaksson", "Lindholm", "Marklund",
    "Niemi", "Peltonen", "Rantanen", "Salonen", "Toivonen", "Virtanen", "Wallin", "Aho",
    "Adams", "Baker", "Bishop", "Blake", "Boone", "Brooks", "Bryant", "Burke", "Caldwell",
    "Campbell", "Cook", "Cooper", "Cross", "Daniels", "Dawson", "Doyle", "Drake", "Duncan",
    "Edwards", "Farrell", "Fleming", "Ford", "Francis", "Garland", "Gibson", "Hansen", "Harris",
    "Henderson", "Holland", "Hudson", "Kane", "Knight", "Lambert", "Larsson", "Mercer", "Meyer",
    "Miller", "Norris", "Parker", "Peters", "Robertson", "Ross", "Sandin", "Strom", "Tanner",
    "Thompson", "Tierney", "Warren", "Watson", "West", "Wilson", "Wright", "Barrett", "Becker",
    "Berg", "Bernier", "Boucher", "Bowen", "Boyle", "Brandt", "Briggs", "Calder", "Callahan",
    "Carver", "Chandler", "Chapman", "Clarke", "Conrad", "Delaney", "Demers", "Donovan",
    "Draper", "Eklund", "Emerson", "Falk", "Fisher", "Foley", "Frost", "Gallagher", "Garrett",
    "Gauthier", "Goodwin", "Graham", "Greene", "Harding", "Harper", "Hart", "Hawkins",
    "Hoffman", "Holt", "Horvath", "Howe", "Iverson", "Kirk", "Kline", "Kovacs", "Kramer",
    "Laird", "Lang", "Larkin", "Larsen", "Leclerc", "Leroux", "Locke", "Lowell", "Madden",
    "Mahoney", "Marin", "McAllister", "McClure", "McNabb", "Mercier", "Monroe", "Morin",
    "Morrow", "Nadeau", "Oakes", "Osborne", "Parsons", "Payne", "Pearce", "Prescott", "Quinlan",
    "Rafferty", "Ramsay", "Reardon", "Redmond", "Reeves", "Renaud", "Ritchie", "Rooney", "Rowe",
    "Sauer", "Schultz", "Shaw", "Sinclair", "Sloan", "Spencer", "Stanton", "Sterling", "Stone",
    "Thorne", "Townsend", "Turnbull", "Vickers", "Ward", "Wilder", "Winslow", "Wolfe", "Yates",
    "York", "Zeller",
];

pub const COACH_FIRST_NAMES: &[&str] = &[
    "Gerard", "Claude", "Barry", "Darryl", "Bruce", "Rick", "Todd", "Peter", "Paul", "Dave",
    "Mike", "John", "Craig", "Lindy", "Ken", "Rod", "Jared", "Dean", "Travis", "Sheldon",
    "Martin", "Jacques", "Alain", "Pascal", "Luc", "Marcel", "Glen", "Doug", "Randy", "Terry",
    "Kirk", "Bob", "Joel", "Andre", "Jon", "Derek", "Spencer", "Lane", "Mitch", "Warren",
];

pub const COACH_LAST_NAMES: &[&str] = &[
    "Babich", "Renney", "Sutter", "Trottier", "Boudreau", "Tocchet", "McLellan", "Laviolette",
    "Maurice", "Tippett", "Keefe", "Cassidy", "Berube", "Ruff", "Hitchcock", "Brind",
    "Bednar", "Evason", "Green", "Woodcroft", "Gallant", "Lemaire", "Vigneault", "Ducharme",
    "Robidoux", "Dineen", "Granato", "Quenneville", "Carlyle", "Crawford", "Muller", "Hartley",
    "Quinn", "Savard", "Cooper", "Lalonde", "Carbery", "Lambert", "Hynes", "Foote",
];

/// Hands out unique "First Last" names from a shuffled cross-product pool.
/// Names that already exist in a loaded world must be reserved up front so
/// regenerated rosters never collide with persisted ones.
pub struct NameGenerator {
    rng: StdRng,
    used: BTreeSet<String>,
    pool: Vec<String>,
    idx: usize,
}

impl NameGenerator {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pool: Vec<String> = FIRST_NAMES
            .iter()
            .flat_map(|first| LAST_NAMES.iter().map(move |last| format!("{} {}", first, last)))
            .collect();
        pool.shuffle(&mut rng);

        NameGenerator {
            rng,
            used: BTreeSet::new(),
            pool,
            idx: 0,
        }
    }

    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.used.insert(name.into());
        }
    }

    pub fn next_name(&mut self) -> String {
        while self.idx < self.pool.len() {
            let name = self.pool[self.idx].clone();
            self.idx += 1;
            if self.used.insert(name.clone()) {
                return name;
            }
        }

        // Pool exhausted after many seasons; suffix a random base until unique.
        let mut suffix = 1u32;
        loop {
            let base = &self.pool[self.rng.random_range(0..self.pool.len())];
            let candidate = format!("{} {}", base, suffix);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn next_coach_name(&mut self) -> String {
        for _ in 0..120 {
            let first = COACH_FIRST_NAMES[self.rng.random_range(0..COACH_FIRST_NAMES.len())];
            let last = COACH_LAST_NAMES[self.rng.random_range(0..COACH_LAST_NAMES.len())];
            let candidate = format!("{} {}", first, last);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
        let fallback = format!("Coach {}", self.rng.random_range(100..999));
        self.used.insert(fallback.clone());
        fallback
    }
}

/// Weighted birth-country table, heaviest on the traditional hockey nations.
pub const PLAYER_BIRTH_COUNTRIES: &[(&str, &str, f64)] = &[
    ("Canada", "CA", 0.34),
    ("United States", "US", 0.225),
    ("Sweden", "SE", 0.08),
    ("Finland", "FI", 0.06),
    ("Russia", "RU", 0.08),
    ("Czechia", "CZ", 0.05),
    ("Slovakia", "SK", 0.03),
    ("Germany", "DE", 0.03),
    ("Switzerland", "CH", 0.03),
    ("Latvia", "LV", 0.02),
    ("Denmark", "DK", 0.02),
    ("Lithuania", "LT", 0.01),
    ("Norway", "NO", 0.005),
    ("Belarus", "BY", 0.005),
    ("Slovenia", "SI", 0.005),
    ("Austria", "AT", 0.005),
    ("France", "FR", 0.005),
];

pub fn sample_birth_country<R: Rng>(rng: &mut R) -> (String, String) {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (country, code, weight) in PLAYER_BIRTH_COUNTRIES {
        cumulative += weight;
        if roll <= cumulative {
            return (country.to_string(), code.to_string());
        }
    }
    let (country, code, _) = PLAYER_BIRTH_COUNTRIES[0];
    (country.to_string(), code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut generator = NameGenerator::new(7);
        let mut seen = BTreeSet::new();
        for _ in 0..2000 {
            assert!(seen.insert(generator.next_name()));
        }
    }

    #[test]
    fn reserved_names_are_skipped() {
        let mut probe = NameGenerator::new(11);
        let first = probe.next_name();

        let mut generator = NameGenerator::new(11);
        generator.reserve([first.clone()]);
        assert_ne!(first, generator.next_name());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = NameGenerator::new(42);
        let mut b = NameGenerator::new(42);
        for _ in 0..50 {
            assert_eq!(a.next_name(), b.next_name());
        }
    }
}
