/// Static TMDB genre filter tables for the browse tabs.
///
/// Genre ids come from the TMDB genre list endpoints and are stable. An empty
/// id means "no genre filter".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
  pub id: &'static str,
  pub name: &'static str,
}

pub const MOVIE_GENRES: &[Genre] = &[
  Genre { id: "", name: "All" },
  Genre { id: "28", name: "Action" },
  Genre { id: "35", name: "Comedy" },
  Genre { id: "18", name: "Drama" },
  Genre { id: "27", name: "Horror" },
  Genre { id: "10749", name: "Romance" },
  Genre { id: "878", name: "Sci-Fi" },
  Genre { id: "53", name: "Thriller" },
  Genre { id: "16", name: "Animation" },
  Genre { id: "12", name: "Adventure" },
  Genre { id: "80", name: "Crime" },
];

pub const KDRAMA_GENRES: &[Genre] = &[
  Genre { id: "", name: "All" },
  Genre { id: "18", name: "Drama" },
  Genre { id: "10749", name: "Romance" },
  Genre { id: "35", name: "Comedy" },
  Genre { id: "80", name: "Crime" },
  Genre { id: "9648", name: "Mystery" },
  Genre { id: "10765", name: "Fantasy" },
  Genre { id: "10759", name: "Action" },
];

pub const ANIME_GENRES: &[Genre] = &[
  Genre { id: "", name: "All" },
  Genre { id: "16", name: "Animation" },
  Genre { id: "28", name: "Action" },
  Genre { id: "12", name: "Adventure" },
  Genre { id: "14", name: "Fantasy" },
  Genre { id: "878", name: "Sci-Fi" },
  Genre { id: "35", name: "Comedy" },
  Genre { id: "10765", name: "Supernatural" },
];
