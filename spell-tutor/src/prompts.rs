//! Guidance prompts for the spell tutorial.
//!
//! Prompts are plain text handed to the narrator. Each lists the spells a
//! class may choose at the current step with a one-line gloss tagged by
//! [`SpellCategory`]. The category is a hint for beginners and plays no part
//! in detection or validation.

use crate::class_data::CharacterClass;
use crate::config::TutorConfig;
use crate::spells::{SpellCatalog, SpellData, SpellSchool};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const CANTRIPS_EXPLAINED: &str = include_str!("prompts/cantrips.txt");
const CANTRIP_TIPS: &str = include_str!("prompts/cantrip_tips.txt");
const SPELL_TIPS: &str = include_str!("prompts/spell_tips.txt");

/// What a spell is mostly good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellCategory {
    Combat,
    Healing,
    Defense,
    Social,
    Utility,
}

impl SpellCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SpellCategory::Combat => "COMBAT",
            SpellCategory::Healing => "HEALING",
            SpellCategory::Defense => "DEFENSE",
            SpellCategory::Social => "SOCIAL",
            SpellCategory::Utility => "UTILITY",
        }
    }
}

impl fmt::Display for SpellCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Description keywords per category, checked in order.
const CATEGORY_KEYWORDS: &[(SpellCategory, &str)] = &[
    (SpellCategory::Combat, r"\b(?:damage|attack)"),
    (SpellCategory::Healing, r"\b(?:heal|restor|reviv|regain)"),
    (SpellCategory::Defense, r"\b(?:armor|protect|shield|ward)"),
    (SpellCategory::Social, r"\b(?:charm|persuad|friend)"),
];

static CATEGORY_RES: LazyLock<Vec<(SpellCategory, Regex)>> = LazyLock::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .map(|(category, pattern)| {
            let re = Regex::new(&format!("(?i){pattern}"))
                .expect("category keywords are literals and must compile");
            (*category, re)
        })
        .collect()
});

/// Best-effort category for a spell. Anything unrecognized is utility.
pub fn categorize(spell: &SpellData) -> SpellCategory {
    if spell.damage_type.is_some() || spell.attack_type.is_some() {
        return SpellCategory::Combat;
    }
    CATEGORY_RES
        .iter()
        .find(|(category, re)| {
            re.is_match(&spell.description)
                || (*category == SpellCategory::Social && spell.school == SpellSchool::Enchantment)
        })
        .map_or(SpellCategory::Utility, |(category, _)| *category)
}

/// The first sentence of a spell's description, or its first `max_chars`
/// characters and "..." when that sentence is too long, followed by the
/// spell's category.
pub fn beginner_description(spell: &SpellData, max_chars: usize) -> String {
    let first = spell.description.split('.').next().unwrap_or_default();
    let brief = if first.chars().count() + 1 > max_chars {
        let cut: String = spell.description.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    } else {
        format!("{first}.")
    };
    format!("{brief} ({})", categorize(spell))
}

/// "1 cantrip", "3 cantrips".
pub(crate) fn count_of(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// How a class's cantrips feel from the inside.
pub fn cantrip_intro(class: CharacterClass) -> &'static str {
    match class {
        CharacterClass::Wizard => "As a Wizard, you study the fundamental building blocks of magic. Cantrips are simple spells you've mastered completely - you can cast them as often as you like without exhausting your magical reserves.",
        CharacterClass::Sorcerer => "Your innate magical bloodline grants you access to cantrips - basic spells that flow naturally from your being. These spells are so ingrained in you that casting them requires no effort.",
        CharacterClass::Bard => "Your musical training has taught you simple magical melodies - cantrips that you can perform endlessly. These are the building blocks of your bardic repertoire.",
        CharacterClass::Cleric => "Your deity grants you divine orisons - simple prayers that require no spell slots. These cantrips represent the most basic blessings your god bestows upon you.",
        CharacterClass::Druid => "Nature has taught you primal cantrips - simple magical effects drawn from the natural world. You can call upon these minor blessings whenever you need them.",
        CharacterClass::Warlock => "Your pact with an otherworldly patron has granted you eldritch cantrips that you can cast at will. These are the first gifts of your mysterious benefactor.",
        _ => "You have access to cantrips - spells you can cast without using spell slots.",
    }
}

/// How a class comes to know its leveled spells.
pub fn spell_intro(class: CharacterClass) -> &'static str {
    match class {
        CharacterClass::Wizard => "Your spellbook contains the leveled spells you've learned during your studies. Unlike cantrips, these spells consume spell slots when cast.",
        CharacterClass::Sorcerer => "Beyond cantrips, you know powerful leveled spells that tap deeper into your magical bloodline. These require spell slots to cast.",
        CharacterClass::Bard => "You've mastered more complex magical songs that require concentration and effort. These leveled spells consume spell slots.",
        CharacterClass::Warlock => "Your patron has granted you knowledge of powerful spells beyond simple cantrips. These require pact magic slots to cast.",
        _ => "You know leveled spells that require spell slots to cast.",
    }
}

/// Prompt for the cantrip step. Empty for classes without cantrips.
pub fn cantrip_selection_prompt(
    class: CharacterClass,
    catalog: &SpellCatalog,
    config: &TutorConfig,
) -> String {
    let (Some(profile), Some(spell_class)) = (class.spell_profile(), class.spell_class()) else {
        return String::new();
    };
    let cantrips = catalog.for_class_at_level(spell_class, 0);
    if cantrips.is_empty() {
        return String::new();
    }
    let count = profile.starting_cantrips as usize;

    let mut prompt = header(class, config);
    prompt.push_str("**CANTRIP SELECTION**\n\n");
    prompt.push_str(cantrip_intro(class));
    prompt.push_str("\n\n");
    prompt.push_str(CANTRIPS_EXPLAINED);
    prompt.push_str("\n**Your available cantrips:**\n\n");
    push_spell_list(&mut prompt, &cantrips, config);
    prompt.push_str(&format!(
        "\n**You must choose exactly {}.**\n\n",
        count_of(count, "cantrip")
    ));
    if config.include_tips {
        prompt.push_str(CANTRIP_TIPS);
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "**Please tell me which {} you'd like to learn.** Type their names clearly (e.g., \"{}\").\n\n",
        count_of(count, "cantrip"),
        example_choice(&cantrips)
    ));
    prompt.push_str(&format!(
        "If you choose fewer or more than {count}, I'll politely remind you how many you need to select."
    ));
    prompt
}

/// Prompt for the spell step of a class that learns a fixed list.
pub fn spell_selection_prompt(
    class: CharacterClass,
    selected_cantrips: &[String],
    catalog: &SpellCatalog,
    config: &TutorConfig,
) -> String {
    let (Some(profile), Some(spell_class)) = (class.spell_profile(), class.spell_class()) else {
        return String::new();
    };
    if profile.prepares_spells() {
        return spell_preparation_prompt(class, selected_cantrips, config);
    }
    let level = config.starting_spell_level;
    let spells = catalog.for_class_at_level(spell_class, level);
    if spells.is_empty() {
        return String::new();
    }
    let count = profile.starting_spells as usize;

    let mut prompt = header(class, config);
    prompt.push_str(&format!("**LEVEL {level} SPELL SELECTION**\n\n"));
    if !selected_cantrips.is_empty() {
        prompt.push_str(&format!(
            "Great choices on cantrips: {}!\n\n",
            selected_cantrips.join(", ")
        ));
    }
    prompt.push_str(spell_intro(class));
    prompt.push_str("\n\n**What are spell slots?**\n");
    prompt.push_str(
        "Spell slots are your magical energy reserves. Each time you cast a leveled spell, \
         you consume one slot of the appropriate level. You regain all spell slots after a long rest. ",
    );
    prompt.push_str(&format!(
        "At Level 1, you'll have {}.\n\n",
        count_of(profile.level_1_slots as usize, "first-level spell slot")
    ));
    prompt.push_str(&format!("**Your available Level {level} spells:**\n\n"));
    push_spell_list(&mut prompt, &spells, config);
    prompt.push_str(&format!(
        "\n**You must choose exactly {}.**\n\n",
        count_of(count, "spell")
    ));
    if config.include_tips {
        prompt.push_str(SPELL_TIPS);
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "**Please tell me which {} you'd like to learn.** Type their names clearly.\n\n",
        count_of(count, "spell")
    ));
    prompt.push_str(&format!(
        "If you choose fewer or more than {count}, I'll gently correct you."
    ));
    prompt
}

/// Spell step for a class that prepares spells. Nothing to choose, so no
/// spells are listed.
pub fn spell_preparation_prompt(
    class: CharacterClass,
    selected_cantrips: &[String],
    config: &TutorConfig,
) -> String {
    let mut prompt = header(class, config);
    prompt.push_str("**SPELL PREPARATION (Not Selection)**\n\n");
    if !selected_cantrips.is_empty() {
        prompt.push_str(&format!(
            "Congratulations on choosing your cantrips: {}!\n\n",
            selected_cantrips.join(", ")
        ));
    }
    prompt.push_str(&format!(
        "**Good news:** As a {class}, you don't choose a fixed list of spells. \
         Instead, you **prepare** spells each day from your full class spell list.\n\n"
    ));
    prompt.push_str("**How it works:**\n");
    prompt.push_str(&format!(
        "- You have access to ALL {class} spells of levels you can cast\n"
    ));
    prompt.push_str("- Each morning, you prepare your level + your spellcasting modifier spells\n");
    prompt.push_str("- You can change your prepared spells after a long rest\n");
    prompt.push_str("- This gives you amazing flexibility!\n\n");
    prompt.push_str(
        "**For now:** Your tutorial character starts with a default prepared spell list. \
         Once you reach Level 1, you'll be able to choose which spells to prepare each day.\n\n",
    );
    prompt.push_str(
        "🎉 **Tutorial complete!** You're ready to begin your adventure. \
         Type \"ready\" or describe what you'd like to do first.",
    );
    prompt
}

fn header(class: CharacterClass, config: &TutorConfig) -> String {
    format!(
        "📚 TUTORIAL MODE - Level {} {class}\n\n",
        config.tutorial_level
    )
}

fn push_spell_list(prompt: &mut String, spells: &[&SpellData], config: &TutorConfig) {
    for spell in spells {
        prompt.push_str(&format!(
            "- **{}**: {}\n",
            spell.name,
            beginner_description(spell, config.gloss_max_chars)
        ));
    }
}

fn example_choice(spells: &[&SpellData]) -> String {
    match spells {
        [first, second, ..] => format!("I choose {} and {}", first.name, second.name),
        [only] => format!("I choose {}", only.name),
        [] => String::new(),
    }
}
