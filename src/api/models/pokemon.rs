use serde::Deserialize;

// Pokédex proxy API models

/// Query parameters for GET /api/pokemonapi
#[derive(Debug, Default, Deserialize)]
pub struct PokemonSearchQuery {
    pub search: Option<String>,
}
