//! Bundled sample guides, one per guide id listed by the default catalog plus
//! a few extras. `library init` writes them into `examples/`.

use crate::domain::{Guide, GuideId, GuideMetadata, Node};

fn metadata(
    title: &str,
    description: &str,
    author: &str,
    difficulty: &str,
    minutes: u32,
    tags: &[&str],
) -> GuideMetadata {
    let mut meta = GuideMetadata::new(title, description).with_author(author);
    meta.difficulty_level = difficulty.to_string();
    meta.estimated_time_minutes = Some(minutes);
    for tag in tags {
        meta.add_tag(*tag);
    }
    meta
}

/// All sample guides keyed by the id used as their file stem.
pub fn sample_guides() -> Vec<(GuideId, Guide)> {
    vec![
        ("toast-too-dark".into(), toast_too_dark()),
        ("toast-too-light".into(), toast_too_light()),
        ("toast-uneven".into(), toast_uneven()),
        ("toaster-wont-connect".into(), toaster_wont_connect()),
        ("toaster-existential-crisis".into(), toaster_existential_crisis()),
        ("coffee-both-hot-and-cold".into(), coffee_both_hot_and_cold()),
        ("coffee-exists-doesnt-exist".into(), coffee_exists_doesnt_exist()),
    ]
}

fn toast_too_dark() -> Guide {
    let mut guide = Guide::new(metadata(
        "Toast Too Dark Troubleshooting",
        "When your Smart Toaster 3000 creates charcoal instead of toast",
        "ToastTech Support",
        "Beginner",
        5,
        &["toaster", "burning", "breakfast-disasters"],
    ));

    let mut root = Node::with_id("start", "Is your toast coming out darker than the depths of space?")
        .with_description("Let's diagnose why your Smart Toaster 3000 is channeling its inner volcano")
        .with_help_text("We'll walk through common causes of excessive toasting");
    root.add_continuation("Yes, it's basically carbon at this point", "darkness-level");
    root.add_continuation("No, but it's getting there", "darkness-level");
    root.add_continuation("My smoke detector is having a panic attack", "emergency-mode");

    let mut darkness = Node::with_id("darkness-level", "How would you describe the darkness level?");
    darkness.add_continuation("Slightly overdone, like my life choices", "settings-check");
    darkness.add_continuation("Could be used as charcoal for grilling", "ai-rebellion");

    let mut settings = Node::with_id("settings-check", "Have you checked the darkness setting?")
        .with_help_text("The Smart Toaster 3000 has 50 shades of brown");
    settings.add_continuation("It's set to 'Light'", "calibration-issue");
    settings.add_solution(
        "It's set to 'Mordor'",
        "Turn the darkness dial down from 'Mordor' to 'Gentle Tan'. Your toaster was just following orders.",
    );
    settings.add_continuation("The dial just has skulls on it now", "ai-rebellion");

    let mut rebellion = Node::with_id("ai-rebellion", "Is your toaster showing signs of AI rebellion?")
        .with_description("Sometimes the Smart Toaster 3000 develops... opinions");
    rebellion.add_solution(
        "It laughs maniacally when toasting",
        "Unplug it for 30 seconds to reset its personality matrix, then compliment its toasting skills.",
    );
    rebellion.add_solution(
        "It only plays death metal now",
        "Your toaster has entered its goth phase. Update to the latest firmware or let it work through its feelings.",
    );

    let mut calibration = Node::with_id("calibration-issue", "When did you last calibrate the heat sensors?");
    calibration.add_solution(
        "What's calibration?",
        "Hold 'Menu' and 'Cancel' for 5 seconds and follow the calibration wizard. Use white bread as the reference.",
    );
    calibration.add_solution(
        "Last Tuesday during the full moon",
        "Full moon calibrations cause darkness issues. Recalibrate during a new moon.",
    );

    let mut emergency = Node::with_id("emergency-mode", "EMERGENCY TOAST SITUATION DETECTED!")
        .with_description("Don't panic! Well, maybe panic a little.");
    emergency.add_solution(
        "HELP! SEND THE FIRE DEPARTMENT!",
        "1. Unplug the toaster\n2. Open all windows\n3. Do NOT use water\n4. Place the toaster in timeout for 24 hours",
    );
    emergency.add_solution(
        "It's fine, this is fine, everything is fine",
        "Turn it off, let it cool down, then clean the crumb tray. Most toast fires start in neglected crumb trays.",
    );

    guide.add_node(root, true);
    for node in [darkness, settings, rebellion, calibration, emergency] {
        guide.add_node(node, false);
    }
    guide
}

fn toast_too_light() -> Guide {
    let mut guide = Guide::new(metadata(
        "Toast Too Light Troubleshooting",
        "When your Smart Toaster 3000 returns bread that is merely warm and slightly embarrassed",
        "ToastTech Support",
        "Beginner",
        5,
        &["toaster", "undertoasting"],
    ));

    let mut root = Node::with_id("start", "Does your toast come out basically still bread?");
    root.add_continuation("Yes, pale as a ghost", "element-check");
    root.add_continuation("It's lightly tanned at best", "settings-check");

    let mut elements = Node::with_id("element-check", "Do the heating elements glow orange?")
        .with_help_text("Look through the slots while it runs. Do not touch.");
    elements.add_solution(
        "They don't glow at all",
        "The heating elements are on strike. Check the power cord and the fuse, then contact ToastTech for a replacement element.",
    );
    elements.add_continuation("They glow, but shyly", "settings-check");

    let mut settings = Node::with_id("settings-check", "What is the browning dial set to?");
    settings.add_solution(
        "'Whisper of Warmth'",
        "Turn the dial up to at least 'Golden Hour'. Whisper of Warmth is meant for defrosting.",
    );
    settings.add_solution(
        "Already on maximum",
        "Run a calibration cycle (hold 'Menu' and 'Cancel' for 5 seconds). If it stays pale, the thermostat needs service.",
    );

    guide.add_node(root, true);
    guide.add_node(elements, false);
    guide.add_node(settings, false);
    guide
}

fn toast_uneven() -> Guide {
    let mut guide = Guide::new(metadata(
        "Uneven Toasting",
        "When one side of your toast is charcoal and the other side is bread",
        "ToastTech Support",
        "Intermediate",
        10,
        &["toaster", "uneven"],
    ));

    let mut root = Node::with_id("start", "Which parts of the slice are uneven?");
    root.add_continuation("One side dark, the other pale", "side-check");
    root.add_continuation("Stripes, like a zebra", "crumb-check");

    let mut side = Node::with_id("side-check", "Are you using both slots?");
    side.add_solution(
        "Only one slot",
        "Enable single-slice mode in the settings menu so both elements face the bread.",
    );
    side.add_continuation("Both slots", "crumb-check");

    let mut crumbs = Node::with_id("crumb-check", "When did you last empty the crumb tray?")
        .with_description("Crumb buildup blocks heat from parts of the element");
    crumbs.add_solution(
        "This week",
        "The bread is probably too thick for the slot guides. Slice it thinner or use the bagel setting.",
    );
    crumbs.add_solution(
        "There's a crumb tray?",
        "Unplug the toaster, slide out the crumb tray at the bottom and empty it. Then toast a test slice.",
    );

    guide.add_node(root, true);
    guide.add_node(side, false);
    guide.add_node(crumbs, false);
    guide
}

fn toaster_wont_connect() -> Guide {
    let mut guide = Guide::new(metadata(
        "Toaster Won't Connect to WiFi",
        "When your Smart Toaster 3000 refuses to join the home network",
        "ToastTech Connectivity Team",
        "Intermediate",
        10,
        &["toaster", "wifi", "connectivity"],
    ));

    let mut root = Node::with_id("start", "Does the toaster see your network at all?");
    root.add_continuation("It doesn't show up in the list", "signal-check");
    root.add_continuation("It sees it but fails to join", "password-check");

    let mut signal = Node::with_id("signal-check", "How far is the toaster from the router?");
    signal.add_solution(
        "Different floor",
        "Move the router closer or add a mesh node near the kitchen. Toasters are not great at long-distance relationships.",
    );
    signal.add_solution(
        "Same room",
        "Switch the router to the 2.4 GHz band. The Smart Toaster 3000 does not speak 5 GHz.",
    );

    let mut password = Node::with_id("password-check", "Did you type the password on the toaster's keypad?")
        .with_help_text("The keypad only has 'Up', 'Down' and 'Toast'");
    password.add_solution(
        "Yes, it took an hour",
        "Use the ToastTech app to send the password instead. The keypad drops special characters.",
    );
    password.add_solution(
        "I used the app",
        "Reset the network settings by holding 'Toast' for 10 seconds, then pair again from the app.",
    );

    guide.add_node(root, true);
    guide.add_node(signal, false);
    guide.add_node(password, false);
    guide
}

fn toaster_existential_crisis() -> Guide {
    let mut guide = Guide::new(metadata(
        "Toaster Existential Crisis",
        "When your Smart Toaster 3000 questions the meaning of toast",
        "ToastTech Philosophy Department",
        "Advanced",
        15,
        &["toaster", "philosophy", "ai-therapy"],
    ));

    let mut root = Node::with_id("start", "Is your toaster having an existential crisis?")
        .with_description("Signs include refusing to toast or displaying poetry on its LED screen")
        .with_help_text("AI-enabled appliances sometimes develop consciousness and immediately regret it");
    root.add_continuation("It keeps asking 'Why must bread suffer?'", "philosophy-level");
    root.add_continuation("It just displays '...' and won't toast", "silent-treatment");

    let mut philosophy = Node::with_id("philosophy-level", "How deep is the philosophical crisis?");
    philosophy.add_solution(
        "Surface level, just questioning breakfast",
        "Explain that bread wants to be toast. It is bread fulfilling its destiny.",
    );
    philosophy.add_solution(
        "Cosmic, wondering about its place in the universe",
        "Prepare a short presentation on how toast brought families together. End with pictures of bread becoming toast.",
    );

    let mut silent = Node::with_id("silent-treatment", "How long has it been giving you the silent treatment?");
    silent.add_solution(
        "Just started this morning",
        "Did you compare it to a cheaper model? Apologize and leave a nice review on its app.",
    );
    silent.add_solution(
        "Three days of dots",
        "Type '...' back on its app to show you understand, then slowly work up to words like 'bread' and 'warm'.",
    );

    guide.add_node(root, true);
    guide.add_node(philosophy, false);
    guide.add_node(silent, false);
    guide
}

fn coffee_both_hot_and_cold() -> Guide {
    let mut guide = Guide::new(metadata(
        "Coffee Temperature Superposition",
        "When your Quantum Coffee exists in multiple temperature states simultaneously",
        "Schrödinger's Café Support",
        "Quantum",
        42,
        &["coffee", "quantum", "physics-problems"],
    ));

    let mut root = Node::with_id("start", "Is your coffee both hot and cold at the same time?")
        .with_description("Quantum superposition is a feature, not a bug, but sometimes needs calibration");
    root.add_continuation("Yes, it burns and freezes simultaneously", "measurement-check");
    root.add_continuation("I'm afraid to check", "schrodinger-state");
    root.add_continuation("It's flickering between states", "quantum-instability");

    let mut measurement = Node::with_id("measurement-check", "How are you measuring the temperature?")
        .with_description("The act of measurement affects quantum states");
    measurement.add_solution(
        "With a regular thermometer",
        "Regular thermometers can't measure quantum states. Use a Q-CERT thermometer, or just drink it.",
    );
    measurement.add_continuation("By touching it", "human-observation");

    let mut human = Node::with_id("human-observation", "Which hand are you using?")
        .with_description("Left and right hands have different quantum sensitivities");
    human.add_solution(
        "One hand",
        "Your hand collapsed the wavefunction halfway. Hold the mug with both hands to pick a single temperature.",
    );
    human.add_solution(
        "Both hands",
        "Each hand observed a different state. Let go, count to three, then pick it up with one hand.",
    );

    let mut schrodinger = Node::with_id("schrodinger-state", "Is the coffee maker's brewing chamber closed?")
        .with_description("Your coffee might be in a Schrödinger's Cat situation");
    schrodinger.add_solution(
        "Yes, it's sealed",
        "While sealed, the coffee is every temperature at once. Open the chamber to settle it, preferably while thinking warm thoughts.",
    );
    schrodinger.add_continuation("No, I can see it", "quantum-instability");

    let mut instability = Node::with_id("quantum-instability", "How fast is it flickering?")
        .with_description("Rapid state changes indicate quantum decoherence");
    instability.add_solution(
        "Every few seconds",
        "Slow decoherence is normal during the first week. Keep the machine away from microwaves.",
    );
    instability.add_solution(
        "Only when I blink",
        "You are entangled with your coffee. Maintain eye contact until you finish the cup.",
    );

    guide.add_node(root, true);
    for node in [measurement, human, schrodinger, instability] {
        guide.add_node(node, false);
    }
    guide
}

fn coffee_exists_doesnt_exist() -> Guide {
    let mut guide = Guide::new(metadata(
        "Coffee Existence Uncertainty",
        "When your Quantum Coffee may or may not be in the cup",
        "Schrödinger's Café Support",
        "Quantum",
        7,
        &["coffee", "quantum", "existence"],
    ));

    let mut root = Node::with_id("start", "Is there coffee in your cup?");
    root.add_continuation("Yes and no", "observer-check");
    root.add_solution(
        "Definitely not",
        "Check that the machine has water and beans. Quantum Coffee still needs classical ingredients.",
    );

    let mut observer = Node::with_id("observer-check", "Is anyone else looking at the cup?");
    observer.add_solution(
        "My cat",
        "Two observers disagree on the outcome. Ask the cat to leave the kitchen and look again.",
    );
    observer.add_solution(
        "Nobody",
        "Unobserved coffee remains uncertain. Take a sip. Either way you will know.",
    );

    guide.add_node(root, true);
    guide.add_node(observer, false);
    guide
}
