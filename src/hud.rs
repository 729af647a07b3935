//! Text drawn around the play field. Selected purely from the latches in
//! the simulation context.
use crate::config::game::BOX_HITS_FOR_CUP;
use crate::sim::RookieContext;

pub struct Headline {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub fn headline(context: &RookieContext) -> Headline {
    if context.show_celebration {
        Headline {
            title: "Rookie House will be unveiled soon...",
            subtitle: "The OG Rookie has been awakened! Stay tuned for the launch!",
        }
    } else {
        Headline {
            title: "Something Epic is Brewing...",
            subtitle: "Help the Rookie unlock the secret!",
        }
    }
}

/// Instruction lines, most prominent first
pub fn instructions(context: &RookieContext) -> [&'static str; 2] {
    if context.show_celebration {
        [
            "TRANSFORMATION COMPLETE!",
            "You've unlocked the OG Rookie! Keep exploring!",
        ]
    } else if context.has_transformed {
        [
            "ROOKIE HOUSE - COMING SOON!",
            "Continue your adventure as the OG Rookie!",
        ]
    } else {
        [
            "Hit the box 5 times to reveal the coffee cup!",
            "Use \u{2190} \u{2192} to move, SPACE to jump",
        ]
    }
}

/// "n/5" above the box, only while hits are in progress
pub fn hit_counter_label(box_hits: u8) -> Option<String> {
    (1..BOX_HITS_FOR_CUP)
        .contains(&box_hits)
        .then(|| format!("{}/{}", box_hits, BOX_HITS_FOR_CUP))
}

pub const LOADING_TITLE: &str = "PLAYGROUND";
pub const LOADING_TEXT: &str = "LOADING...";
pub const LOADING_STATUS: &str = "PREPARING ROOKIE ASSETS...";

const LOADING_BAR_BLOCKS: usize = 20;

/// Framed block bar for the loading screen, top border, bar and bottom border
pub fn loading_bar(percent: u32) -> [String; 3] {
    let filled = (percent.min(100) as usize * LOADING_BAR_BLOCKS) / 100;
    let border = "\u{2500}".repeat(LOADING_BAR_BLOCKS * 2);
    [
        format!("\u{250C}{}\u{2510}", border),
        format!(
            "\u{2502}{}{}\u{2502}",
            "\u{2588}\u{2588}".repeat(filled),
            "\u{2591}\u{2591}".repeat(LOADING_BAR_BLOCKS - filled)
        ),
        format!("\u{2514}{}\u{2518}", border),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(bar: &str, block: char) -> usize {
        bar.chars().filter(|c| *c == block).count() / 2
    }

    #[test]
    fn loading_bar_fills_with_progress() {
        let [top, empty, bottom] = loading_bar(0);
        assert_eq!(blocks(&empty, '\u{2591}'), 20);
        assert_eq!(top.chars().count(), empty.chars().count());
        assert_eq!(bottom.chars().count(), empty.chars().count());

        let half = &loading_bar(50)[1];
        assert_eq!(blocks(half, '\u{2588}'), 10);
        assert_eq!(blocks(half, '\u{2591}'), 10);

        // rounds down to whole blocks
        assert_eq!(blocks(&loading_bar(99)[1], '\u{2588}'), 19);
        assert_eq!(blocks(&loading_bar(100)[1], '\u{2588}'), 20);
        assert_eq!(loading_bar(250), loading_bar(100));
    }

    #[test]
    fn counter_label_only_between_first_and_last_hit() {
        assert_eq!(hit_counter_label(0), None);
        assert_eq!(hit_counter_label(1).as_deref(), Some("1/5"));
        assert_eq!(hit_counter_label(4).as_deref(), Some("4/5"));
        assert_eq!(hit_counter_label(5), None);
    }

    #[test]
    fn text_follows_latches() {
        let mut context = RookieContext::new();
        assert_eq!(headline(&context).title, "Something Epic is Brewing...");
        assert!(instructions(&context)[0].starts_with("Hit the box"));

        context.has_transformed = true;
        assert_eq!(instructions(&context)[0], "ROOKIE HOUSE - COMING SOON!");

        context.show_celebration = true;
        assert_eq!(instructions(&context)[0], "TRANSFORMATION COMPLETE!");
        assert!(headline(&context).title.starts_with("Rookie House"));
    }
}
