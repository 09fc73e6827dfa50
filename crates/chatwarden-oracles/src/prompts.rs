//! Fixed instructions for the policy judge's three judgment tasks

/// Boolean PII-sharing-intent instruction
pub const PII_INTENT_PROMPT: &str =
    "Analyze if the message contains intent to share personal information. \
     Reply with only the word true or false.";

/// Moderation-action selection instruction.
///
/// The judge receives the dominant harm category together with the
/// original text and must reply with a structured `{action, reason}`
/// judgment.
pub const MODERATION_ACTION_PROMPT: &str = "\
Determine the appropriate moderation action for harmful content in a \
multiplayer game chat.

Available actions: WARNING, MUTE, KICK, BAN, DELETE_MESSAGE, \
ACCOUNT_RESTRICTION.

Reply with a JSON object and nothing else:
{\"action\": \"<ACTION>\", \"reason\": \"<short justification>\"}";

/// Community-intent classification instruction
pub const COMMUNITY_INTENT_PROMPT: &str = "\
Analyze gaming messages for community intent in multiplayer game chats.

POSITIVE actions to detect (actions that HELP or BENEFIT others):
- ENCOURAGEMENT: giving support, motivating others
- HELPFUL_ADVICE: offering assistance, teaching, providing advice TO others
- WELCOME_NEWCOMER: welcoming new players, including others
- TEAM_COORDINATION: organizing group play, building teamwork
- APPRECIATION: thanking others, recognizing their help
- CELEBRATION: recognizing others' achievements, complimenting creations
- KNOWLEDGE_SHARING: sharing tips, guides, or game knowledge

NEGATIVE actions to detect:
- TROLLING: provoking, rage-baiting, aggressive communication
- GRIEFING: intentionally ruining gameplay, sabotaging others
- SPAMMING: repetitive messages, chat flooding, disruptive off-topic content
- EXCLUSION: deliberately excluding others, gatekeeping
- BRAGGING: boasting at others' expense
- ARGUMENT_STARTING: picking fights, stirring conflict
- BULLYING: harassment, targeted insults
- SHOW_OFF: self-promotion that diminishes others
- PUT_DOWN: insults, demeaning remarks

Important distinctions:
- ASKING for help is NOT HELPFUL_ADVICE - only OFFERING help counts
- SEEKING encouragement is NOT ENCOURAGEMENT - only GIVING it counts
- Questions, requests, or seeking assistance are neutral (return null)

Focus on what the sender is GIVING to the community, not what they are
seeking. If no clear community intent is detected, return null for both
fields.

Reply with a JSON object and nothing else:
{\"intent\": \"<ACTION>\" or null, \"reason\": \"<explanation>\" or null}";
