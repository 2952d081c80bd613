//! CPTEC climate codes and their display text

/// Display text for one climate code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimateCondition {
    /// Portuguese description
    pub description: &'static str,
    /// Emoji shown before the description (may be empty)
    pub emoji: &'static str,
}

const fn condition(description: &'static str, emoji: &'static str) -> ClimateCondition {
    ClimateCondition { description, emoji }
}

/// Look up a CPTEC climate code. Unknown codes return `None`.
#[must_use]
pub fn climate_condition(code: &str) -> Option<ClimateCondition> {
    let found = match code {
        "ec" => condition("Encoberto com Chuvas Isoladas", "🌦"),
        "ci" => condition("Chuvas Isoladas", "🌦"),
        "c" => condition("Chuva", "🌧"),
        "in" => condition("Instável", "🌦"),
        "pp" => condition("Poss. de Pancadas de Chuva", "🌦"),
        "cm" => condition("Chuva pela Manhã", "🌧"),
        "cn" => condition("Chuva a Noite", "🌧"),
        "pt" => condition("Pancadas de Chuva a Tarde", "🌦"),
        "pm" => condition("Pancadas de Chuva pela Manhã", "🌦"),
        "np" => condition("Nublado e Pancadas de Chuva", "🌦"),
        "pc" => condition("Pancadas de Chuva", "🌦"),
        "pn" => condition("Parcialmente Nublado", "🌤"),
        "cv" => condition("Chuvisco", "🌧"),
        "ch" => condition("Chuvoso", "🌧"),
        "t" => condition("Tempestade", "⛈"),
        "ps" => condition("Predomínio de Sol", "☀"),
        "e" => condition("Encoberto", "⛅"),
        "n" => condition("Nublado", "🌥"),
        "cl" => condition("Céu Claro", "☀"),
        "nv" => condition("Nevoeiro", "🌫"),
        "g" => condition("Geada", "❄"),
        "ne" => condition("Neve", "☃"),
        "nd" => condition("Não Definido", ""),
        "pnt" => condition("Pancadas de Chuva a Noite", "🌧"),
        "psc" => condition("Possibilidade de Chuva", "🌧"),
        "pcm" => condition("Possibilidade de Chuva pela Manhã", "🌧"),
        "pct" => condition("Possibilidade de Chuva a Tarde", "🌧"),
        "pcn" => condition("Possibilidade de Chuva a Noite", "🌧"),
        "npt" => condition("Nublado com Pancadas a Tarde", "🌧"),
        "npn" => condition("Nublado com Pancadas a Noite", "🌧"),
        "ncn" => condition("Nublado com Poss. de Chuva a Noite", "🌧"),
        "nct" => condition("Nublado com Poss. de Chuva a Tarde", "🌧"),
        "ncm" => condition("Nubl. c/ Poss. de Chuva pela Manhã", "🌧"),
        "npm" => condition("Nublado com Pancadas pela Manhã", "🌧"),
        "npp" => condition("Nublado com Possibilidade de Chuva", "🌧"),
        "vn" => condition("Variação de Nebulosidade", "🌥"),
        "ct" => condition("Chuva a Tarde", "🌧"),
        "ppn" => condition("Poss. de Panc. de Chuva a Noite", "🌧"),
        "ppt" => condition("Poss. de Panc. de Chuva a Tarde", "🌧"),
        "ppm" => condition("Poss. de Panc. de Chuva pela Manhã", "🌧"),
        _ => return None,
    };
    Some(found)
}
