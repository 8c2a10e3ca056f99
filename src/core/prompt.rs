//! Prompt composition for each artifact kind.
//!
//! Composition is pure: identical inputs always yield an identical
//! [`PromptSpec`]. Identity, status, timestamps and the requested length are
//! never asked of the generator; they are filled in locally.

use schemars::JsonSchema;

use crate::domain::{ImageAttachment, ItemKind, Profile, ScriptLength, MAX_CAROUSEL_IMAGES};
use crate::error::GenerationError;

use super::response::{CarouselResponse, PostResponse, ScriptResponse};
use super::schema::ResponseSchema;

/// Pattern-interrupt hook formulas the generator must pick from
pub const HOOK_TEMPLATES: [&str; 5] = [
    "Pare de [erro comum] agora mesmo",
    "Ninguém te conta isso sobre [tema]",
    "Eu fiz [ação] por [tempo] e isso aconteceu",
    "Se você [situação], assista até o final",
    "O maior mito sobre [tema] é...",
];

/// A natural-language instruction paired with the output shape it must follow
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    pub kind: ItemKind,
    pub instruction: String,
    pub schema: ResponseSchema,
}

fn schema_of<T: JsonSchema>() -> Result<ResponseSchema, GenerationError> {
    ResponseSchema::of::<T>().map_err(|e| {
        GenerationError::InvalidRequest(format!("response schema could not be rendered: {}", e))
    })
}

/// Output shape of a script response
pub fn script_schema() -> Result<ResponseSchema, GenerationError> {
    schema_of::<ScriptResponse>()
}

/// Output shape of a post response; `slides` only exists for carousels
pub fn post_schema(is_carousel: bool) -> Result<ResponseSchema, GenerationError> {
    if is_carousel {
        schema_of::<CarouselResponse>()
    } else {
        schema_of::<PostResponse>()
    }
}

/// Compose the instruction and schema for a short-video script
pub fn compose_script_prompt(
    topic: &str,
    profile: &Profile,
    length: ScriptLength,
) -> Result<PromptSpec, GenerationError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(GenerationError::InvalidRequest(
            "script topic must not be empty".to_string(),
        ));
    }

    let hooks = HOOK_TEMPLATES
        .iter()
        .map(|t| format!("    - \"{}\"", t))
        .collect::<Vec<_>>()
        .join("\n");

    let instruction = format!(
        r#"Você é o estrategista de conteúdo número #1 do mundo, mestre em algoritmos de retenção e psicologia do consumo rápido para Reels, TikTok e Shorts.

PERFIL DO CRIADOR:
- Nicho: {niche}
- Tom de Voz: {tone}
- Objetivo: {objective}
- Duração: {length} ({length_desc})

TEMA PARA O ROTEIRO: "{topic}"

DIRETRIZES:
- O gancho DEVE ser uma "Interrupção de Padrão" hipnótica, construída a partir de UM destes modelos:
{hooks}
- Estruture o conteúdo em blocos de retenção, na ordem em que serão gravados.
- Responda em Português Brasil.

ESTRUTURA DE SAÍDA JSON:
- title: Título viral
- hook: {{ text: "fala", action: "ação visual" }}
- development: Array de {{ text: "fala", action: "ação" }}
- cta: {{ text: "fechamento", action: "ação" }}
- tips: Array de 4 dicas de gravação
- reachTips: Array de 3 dicas de alcance
- nextThemes: Array de {{ title, reasoning }}
- durationSeconds: Tempo estimado em segundos (inteiro)"#,
        niche = profile.niche,
        tone = profile.tone_description,
        objective = profile.objective,
        length = length,
        length_desc = length.description(),
        topic = topic,
        hooks = hooks,
    );

    Ok(PromptSpec {
        kind: ItemKind::Script,
        instruction,
        schema: script_schema()?,
    })
}

/// Compose the instruction and schema for an image post or carousel
pub fn compose_post_prompt(
    images: &[ImageAttachment],
    profile: &Profile,
    user_context: &str,
    is_carousel: bool,
) -> Result<PromptSpec, GenerationError> {
    if images.is_empty() {
        return Err(GenerationError::InvalidRequest(
            "at least one image is required".to_string(),
        ));
    }
    if !is_carousel && images.len() != 1 {
        return Err(GenerationError::InvalidRequest(format!(
            "a single post takes exactly 1 image, got {}",
            images.len()
        )));
    }
    if images.len() > MAX_CAROUSEL_IMAGES {
        return Err(GenerationError::InvalidRequest(format!(
            "a carousel takes at most {} images, got {}",
            MAX_CAROUSEL_IMAGES,
            images.len()
        )));
    }

    let subject = if images.len() > 1 {
        "estas imagens"
    } else {
        "esta imagem"
    };
    let format_rules = if is_carousel {
        format!(
            "TIPO: Carrossel\n\
             - Crie slides numerados a partir de 1 (slideNumber), na ordem de exibição.\n\
             - No máximo {} slides.\n\
             - Retorne JSON com title, caption, hashtags (array), musicSuggestions (array), nextImageTips (array) e slides (array de {{ slideNumber, text, visualAdvice }}).",
            MAX_CAROUSEL_IMAGES
        )
    } else {
        "TIPO: Post Único\n\
         - NÃO inclua o campo slides.\n\
         - Retorne JSON com title, caption, hashtags (array), musicSuggestions (array) e nextImageTips (array)."
            .to_string()
    };

    let instruction = format!(
        "Analise {subject} e crie uma estratégia mestre de Instagram em PORTUGUÊS BRASIL.\n\
         NICHO: {niche}\n\
         TOM DE VOZ: {tone}\n\
         OBJETIVO: {objective}\n\
         CONTEXTO: {context}\n\
         {format_rules}",
        subject = subject,
        niche = profile.niche,
        tone = profile.tone_description,
        objective = profile.objective,
        context = user_context.trim(),
        format_rules = format_rules,
    );

    Ok(PromptSpec {
        kind: ItemKind::Post,
        instruction,
        schema: post_schema(is_carousel)?,
    })
}
