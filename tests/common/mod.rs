use httpmock::prelude::*;
use httpmock::Mock;
use swapi_etl::CliConfig;

/// (id, name, height, species id, films appeared in)
pub const CHARACTERS: [(u32, &str, &str, Option<u32>, usize); 12] = [
    (1, "Luke Skywalker", "172", Some(1), 5),
    (2, "C-3PO", "167", Some(2), 6),
    (3, "R2-D2", "96", Some(2), 7),
    (4, "Darth Vader", "202", Some(1), 4),
    (5, "Leia Organa", "150", Some(1), 5),
    (10, "Obi-Wan Kenobi", "182", Some(1), 6),
    (13, "Chewbacca", "228", Some(3), 5),
    (14, "Han Solo", "180", Some(1), 4),
    (20, "Yoda", "66", Some(6), 5),
    (21, "Palpatine", "170", Some(1), 5),
    (11, "Anakin Skywalker", "188", Some(1), 3),
    (35, "Padmé Amidala", "185", Some(1), 3),
];

pub const SPECIES: [(u32, &str); 4] = [
    (1, "Human"),
    (2, "Droid"),
    (3, "Wookiee"),
    (6, "Yoda's species"),
];

pub const EXPECTED_ORDER: [&str; 10] = [
    "Chewbacca",
    "Darth Vader",
    "Obi-Wan Kenobi",
    "Han Solo",
    "Luke Skywalker",
    "Palpatine",
    "C-3PO",
    "Leia Organa",
    "R2-D2",
    "Yoda",
];

/// A mock Star Wars API plus an upload endpoint echoing a fixed body.
pub struct SwapiFixture {
    pub server: MockServer,
}

impl SwapiFixture {
    pub fn start() -> Self {
        let fixture = Self {
            server: MockServer::start(),
        };
        fixture.mount_films();
        for (id, name, height, species, _) in CHARACTERS {
            fixture.mount_character(id, name, height, species);
        }
        for (id, name) in SPECIES {
            fixture.mount_species(id, name);
        }
        fixture
    }

    pub fn url(&self, path: &str) -> String {
        self.server.url(path)
    }

    /// Film `i` lists every character appearing in more than `i` films.
    fn mount_films(&self) {
        let films: Vec<serde_json::Value> = (0..7)
            .map(|i| {
                let characters: Vec<String> = CHARACTERS
                    .iter()
                    .filter(|(_, _, _, _, appearances)| *appearances > i)
                    .map(|(id, ..)| self.url(&format!("/api/people/{}/", id)))
                    .collect();
                serde_json::json!({
                    "title": format!("Episode {}", i + 1),
                    "characters": characters
                })
            })
            .collect();

        self.server.mock(|when, then| {
            when.method(GET).path("/api/films/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "count": films.len(),
                    "next": null,
                    "previous": null,
                    "results": films
                }));
        });
    }

    fn mount_character(&self, id: u32, name: &str, height: &str, species: Option<u32>) {
        let species_urls: Vec<String> = species
            .map(|s| vec![self.url(&format!("/api/species/{}/", s))])
            .unwrap_or_default();
        self.server.mock(|when, then| {
            when.method(GET).path(format!("/api/people/{}/", id));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "name": name,
                    "height": height,
                    "species": species_urls
                }));
        });
    }

    fn mount_species(&self, id: u32, name: &str) {
        self.server.mock(|when, then| {
            when.method(GET).path(format!("/api/species/{}/", id));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"name": name, "classification": "mammal"}));
        });
    }

    pub fn mount_upload(&self) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST)
                .path("/post")
                .body_contains("name,species,height,appearances");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "files": {
                        "file": "name,species,height,appearances\nChewbacca,Wookiee,228,5\n...\nYoda,Yoda's species,66,5\n"
                    },
                    "form": {}
                }));
        })
    }

    pub fn config(&self, output_path: &str) -> CliConfig {
        CliConfig {
            films_endpoint: self.url("/api/films/"),
            upload_endpoint: self.url("/post"),
            output_path: output_path.to_string(),
            timeout_seconds: 5,
            ..CliConfig::default()
        }
    }
}
