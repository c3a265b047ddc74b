use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::backend::BackendKind;

const INTRO_TEXT: &str = "Hola, soy Ana. Esta es la historia \"Cómo reprobé y sobreviví para contarlo\". \n\
En la universidad aprendí que equivocarse no es el fin: es una oportunidad para ajustar métodos, pedir ayuda y levantarse con más fuerza. \
En esta historia te cuento cómo un examen reprobado me llevó a cambiar hábitos, encontrar nuevos aliados y, por supuesto, a depender de mucho café barato.";

const TIP1_TEXT: &str = "Consejos para hackear tu horario de sueño. Primero: prioriza la calidad sobre la cantidad; establece una ventana de sueño regular y evita pantallas una hora antes. \
Segundo: utiliza siestas estratégicas de 20 minutos; no hagas de dormir cuatro horas la regla. \
Tercero: cuida tu alimentación y tu hidratación para mantener la concentración.";

const TIP2_TEXT: &str = "Guía rápida de comida barata cerca del campus. Busca los puestos locales que ofrecen menús del día; compara precios y porciones, y prueba las recomendaciones de otros estudiantes. \
Opta por carbohidratos complejos y proteínas sencillas para energías largas. Y recuerda: compartir es ahorrar.";

const TIP3_TEXT: &str = "Amor en tiempos de finales: sí es posible, con comunicación y planificación. \
Hablen de prioridades, establezcan horarios de estudio y de descanso en pareja, y apoyen metas académicas mutuamente. \
No te olvides de espacio personal: rendir en la universidad y cuidar una relación requieren equilibrio.";

const CON1_TEXT: &str = "Organiza tu semana: divide grandes tareas en pasos pequeños, planifica bloques de estudio de 50 minutos y usa listas de tareas para priorizar.";
const CON2_TEXT: &str = "Cuida tu salud: mantén una rutina de sueño regular, desayuna algo nutritivo y mueve el cuerpo con pequeños paseos durante el día.";
const CON3_TEXT: &str = "Haz contactos: asiste a actividades en el campus, únete a grupos de estudio y comparte recursos. Las redes abren oportunidades.";
const CON4_TEXT: &str = "Técnicas de estudio: aplica Pomodoro, crea mapas mentales y explica lo aprendido a otra persona para reforzar la memoria.";
const CON5_TEXT: &str = "Gestión del dinero: registra tus gastos, establece un presupuesto mensual y busca opciones de comida y transporte económicas.";
const CON6_TEXT: &str = "Cuida tu salud mental: habla con amigos, busca apoyo profesional si lo necesitas y reserva tiempo para actividades que te relajen.";

/// What can be played for one track id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSource {
    pub audio: Option<String>,
    pub text: Option<String>,
}

/// Backend chosen for a track, with the payload it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Speech(String),
    Audio(String),
}

impl Resolved {
    pub fn kind(&self) -> BackendKind {
        match self {
            Resolved::Speech(_) => BackendKind::SynthesizedSpeech,
            Resolved::Audio(_) => BackendKind::RecordedAudio,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackCatalog {
    tracks: BTreeMap<String, TrackSource>,
}

impl TrackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrations shipped with the page: recorded intro and tips, spoken texts
    /// for every card
    pub fn builtin() -> Self {
        Self::new()
            .with_audio("intro", "audio/intro.mp3")
            .with_audio("tip1", "audio/tip1.mp3")
            .with_audio("tip2", "audio/tip2.mp3")
            .with_audio("tip3", "audio/tip3.mp3")
            .with_text("intro", INTRO_TEXT)
            .with_text("tip1", TIP1_TEXT)
            .with_text("tip2", TIP2_TEXT)
            .with_text("tip3", TIP3_TEXT)
            .with_text("con1", CON1_TEXT)
            .with_text("con2", CON2_TEXT)
            .with_text("con3", CON3_TEXT)
            .with_text("con4", CON4_TEXT)
            .with_text("con5", CON5_TEXT)
            .with_text("con6", CON6_TEXT)
    }

    pub fn with_audio(mut self, track_id: &str, source: &str) -> Self {
        self.tracks.entry(track_id.to_string()).or_default().audio = Some(source.to_string());
        self
    }

    pub fn with_text(mut self, track_id: &str, text: &str) -> Self {
        self.tracks.entry(track_id.to_string()).or_default().text = Some(text.to_string());
        self
    }

    pub fn get(&self, track_id: &str) -> Option<&TrackSource> {
        self.tracks.get(track_id)
    }

    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Spoken text wins whenever speech is available, even over a recording.
    /// Recorded audio is the fallback.
    pub fn resolve(&self, track_id: &str, speech_available: bool) -> Option<Resolved> {
        let source = self.tracks.get(track_id)?;

        if speech_available {
            if let Some(text) = source.text.as_deref().filter(|t| !t.trim().is_empty()) {
                return Some(Resolved::Speech(text.to_string()));
            }
        }

        source
            .audio
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(|a| Resolved::Audio(a.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_wins_over_recording() {
        let catalog = TrackCatalog::builtin();
        let resolved = catalog.resolve("intro", true).unwrap();
        assert_eq!(resolved.kind(), BackendKind::SynthesizedSpeech);
    }

    #[test]
    fn recording_is_the_fallback_without_speech() {
        let catalog = TrackCatalog::builtin();
        assert_eq!(
            catalog.resolve("tip1", false),
            Some(Resolved::Audio("audio/tip1.mp3".into()))
        );
    }

    #[test]
    fn text_only_tracks_need_speech() {
        let catalog = TrackCatalog::builtin();
        assert!(matches!(catalog.resolve("con3", true), Some(Resolved::Speech(_))));
        assert_eq!(catalog.resolve("con3", false), None);
    }

    #[test]
    fn unknown_and_blank_tracks_resolve_to_nothing() {
        let catalog = TrackCatalog::new().with_text("blank", "   ");
        assert_eq!(catalog.resolve("missing", true), None);
        assert_eq!(catalog.resolve("blank", true), None);
    }

    #[test]
    fn builtin_lists_every_card() {
        let catalog = TrackCatalog::builtin();
        let ids: Vec<&str> = catalog.track_ids().collect();
        assert_eq!(
            ids,
            vec!["con1", "con2", "con3", "con4", "con5", "con6", "intro", "tip1", "tip2", "tip3"]
        );
    }
}
