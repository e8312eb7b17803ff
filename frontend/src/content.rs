use crate::quiz::{Gender, QuizAnswers};

pub const TITLE: &str = "NO ESTÁS SOLO";
pub const OFFER_TITLE: &str = "TU PROTOCOLO PERSONALIZADO ESTÁ LISTO";
pub const CTA_LABEL: &str = "🔓 SÍ, QUIERO MI PLAN AHORA (Acceso Inmediato - $12.99)";
pub const REVEAL_OFFER_BUTTON: &str = "🔓 VER MI OFERTA EXCLUSIVA";
pub const OFFER_UNLOCKED_TITLE: &str = "DESBLOQUEASTE TU OFERTA EXCLUSIVA";
pub const VIDEO_INTRO: &str = "Mira cómo funciona (2 min)";

pub const LOADING_TITLE: &str = "ANALIZANDO TU CASO";
pub const LOADING_MESSAGE: &str = "Generando tu protocolo de 72 horas...";
pub const LOADING_KEEP_OPEN: &str = "✨ No cierres ni actualices esta página";

pub const REVEAL_OFFER_TITLE: &str = "Tu Oferta Exclusiva Está Lista";
pub const REVEAL_OFFER_SUBTITLE: &str = "Acceso inmediato al Plan Completo de 21 Días";

pub const OFFER_SUMMARY_HEADING: &str = "Basado en tu situación específica:";
pub const SOCIAL_PROOF: &str = "✓ +12.847 reconquistas exitosas";
pub const EXCLUSIVE_NOTE: &str = "Exclusivo para quien completó el análisis personalizado";

pub const NOT_SPECIFIED: &str = "No especificado";

pub struct LoadingStep {
    pub icon: &'static str,
    pub text: &'static str,
}

pub const LOADING_STEPS: [LoadingStep; 4] = [
    LoadingStep { icon: "📊", text: "Respuestas procesadas" },
    LoadingStep { icon: "🔍", text: "Identificando patrones..." },
    LoadingStep { icon: "🧠", text: "Generando diagnóstico..." },
    LoadingStep { icon: "📋", text: "Generando tu protocolo de 72 horas..." },
];

pub const FEATURES: [&str; 4] = [
    "📱 FASE 0-24h: El Primer Contacto\n\"El mensaje exacto que debes enviar\"\n\"Cómo romper el silencio sin parecer desesperado\"",
    "💬 FASE 24-48h: La Reconexión Emocional\n\"Cómo hacer que QUIERA hablar contigo\"\n\"Los gatillos emocionales que funcionan\"",
    "❤️ FASE 48-72h: El Punto de Inflexión\n\"Cómo transformar una conversación en un encuentro\"\n\"Qué decir para que quiera verte\"",
    "🔥 DÍAS 4-21: El Protocolo de Consolidación\n\"Cómo mantener el momentum\"\n\"Cómo evitar los errores que hacen que se aleje de nuevo\"",
];

pub const WINDOW_72H_COPY: &str = "Pero aquí está el secreto que lo cambia todo:

En CADA FASE, existe una acción específica
que puedes hacer para reactivar sus sentimientos.

No es manipulación.
No es juego psicológico.

Es simplemente entender cómo funciona su cerebro.
Y usar ese conocimiento a tu favor.";

/// Answer rows shown in both the diagnosis block and the offer summary.
pub fn answer_summary(answers: &QuizAnswers) -> [(&'static str, &str); 4] {
    [
        ("Tiempo de separación", answers.time_separation.as_deref().unwrap_or("Reciente")),
        ("Quién terminó", answers.who_ended.as_deref().unwrap_or(NOT_SPECIFIED)),
        ("Situación actual", answers.current_situation.as_deref().unwrap_or(NOT_SPECIFIED)),
        ("Tu nivel de compromiso", answers.commitment_level.as_deref().unwrap_or(NOT_SPECIFIED)),
    ]
}

pub fn diagnosis_copy(answers: &QuizAnswers) -> String {
    let rows = answer_summary(answers)
        .iter()
        .map(|(label, value)| format!("✓ {}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Tu situación específica:
{}

Pero aquí está lo más importante:

+12.847 personas ya pasaron EXACTAMENTE
por lo que estás viviendo ahora.

¿Y sabes qué descubrieron?

Que la ruptura no es el final.
Es solo una pausa.

Una pausa que TÚ puedes revertir.

Porque existe un patrón.
Un protocolo que funciona.

Y estás a punto de descubrir cuál es el tuyo.",
        rows
    )
}

pub fn situation_insight(answers: &QuizAnswers) -> Option<String> {
    let pronoun = answers.gender.partner_pronoun();
    let insight = match answers.current_situation.as_deref()? {
        "CONTACTO CERO" => "El contacto cero puede ser estratégico, pero también puede estar creando distancia. Necesitas saber CUÁNDO romperlo.".to_string(),
        "ME IGNORA" => format!("Si {} te ignora, hay una razón psicológica específica. No es personal, es un mecanismo de defensa que podemos revertir.", pronoun),
        "BLOQUEADO" => "Estar bloqueado parece definitivo, pero es una reacción emocional extrema que indica que aún hay sentimientos fuertes.".to_string(),
        "SÓLO TEMAS NECESARIOS" => format!("La comunicación mínima es una señal de que {} está construyendo barreras emocionales, pero aún mantiene un canal abierto.", pronoun),
        "HABLAMOS A VECES" => "La comunicación ocasional es una oportunidad de oro. Estás en la fase perfecta para aplicar el protocolo.".to_string(),
        "SOMOS AMIGOS" => "La \"amistad\" después de una ruptura es un campo minado emocional. Puede ser tu mayor ventaja o tu peor enemiga.".to_string(),
        "ENCUENTROS ÍNTIMOS" => "Los encuentros íntimos indican que la atracción física sigue viva, pero falta la conexión emocional profunda.".to_string(),
        _ => return None,
    };
    Some(insight)
}

pub fn phase_text(gender: Gender, phase: u8) -> Option<String> {
    let pronoun = gender.partner_pronoun_capitalized();
    let text = match phase {
        1 => format!("{} siente \"alivio\" inicial → La dopamina cae 67%", pronoun),
        2 => format!("{} \"olvida\" los buenos momentos → La oxitocina se desconecta", pronoun),
        3 => format!("{} te ve diferente → El córtex prefrontal reescribe memorias", pronoun),
        _ => return None,
    };
    Some(text)
}

/// `m:ss`, minutes unbounded.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(2820), "47:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn insight_uses_partner_pronoun() {
        let answers = QuizAnswers {
            gender: Gender::Mujer,
            current_situation: Some("ME IGNORA".into()),
            ..Default::default()
        };
        let insight = situation_insight(&answers).unwrap();
        assert!(insight.starts_with("Si él te ignora"));
    }

    #[test]
    fn unknown_situation_has_no_insight() {
        let answers = QuizAnswers {
            current_situation: Some("OTRA COSA".into()),
            ..Default::default()
        };
        assert_eq!(situation_insight(&answers), None);
        assert_eq!(situation_insight(&QuizAnswers::default()), None);
    }

    #[test]
    fn phase_text_only_for_known_phases() {
        assert!(phase_text(Gender::Hombre, 1).unwrap().starts_with("Ella siente"));
        assert!(phase_text(Gender::Mujer, 3).unwrap().starts_with("Él te ve"));
        assert_eq!(phase_text(Gender::Hombre, 4), None);
    }

    #[test]
    fn diagnosis_fills_missing_answers() {
        let copy = diagnosis_copy(&QuizAnswers::default());
        assert!(copy.contains("✓ Tiempo de separación: Reciente"));
        assert!(copy.contains("✓ Quién terminó: No especificado"));
        assert!(copy.contains("¿Y sabes qué descubrieron?"));
        assert!(copy.ends_with("Porque existe un patrón.\nUn protocolo que funciona.\n\nY estás a punto de descubrir cuál es el tuyo."));
    }
}
