//! Serenity event handler.
//!
//! Gateway events are translated into repository and moderation calls.
//! Failures while handling an event are logged; failures while handling a
//! slash command are reported back to the caller as an error embed.

use crate::commands::{BotCommand, definitions, self_role_channel};
use crate::conversions::{ToCoven, ToSerenity, reaction_for_key};
use crate::embeds::{LEVEL, MODERATION, Notice, ROLE_SYSTEM, SERVER_SYSTEM, colours};
use crate::options::CommandInput;
use coven_core::{
    Blacklist, ChannelId, ChannelPurpose, GuildId, Hand, Outcome, RoleId, UnbanOutcome, UserId,
    emoji_key, render_welcome, roll_dice,
};
use coven_database::{GuildConfigRepository, LevelRepository, SelfRoleRepository};
use coven_error::{CommandError, CommandErrorKind, CovenResult, PlatformError, PlatformResult};
use coven_moderation::{ModerationService, PardonOutcome};
use serenity::all::{
    ActivityData, Command, CommandInteraction, Context, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateMessage,
    EditInteractionResponse, EventHandler, GatewayIntents, Http, Interaction, Member, Message,
    Reaction, ReactionType, Ready, User,
};
use serenity::async_trait;
use tracing::{debug, error, info, instrument, warn};

/// Reason recorded when a level reward is granted.
const LEVEL_REWARD_REASON: &str = "Level reward";
/// Reason recorded when a self-role changes.
const SELF_ROLE_REASON: &str = "Self-role reaction";
/// Reason recorded for the join role.
const JOIN_ROLE_REASON: &str = "Join role";

/// Runtime settings for [`CovenHandler`].
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct HandlerSettings {
    /// Guilds to register commands in; empty registers them globally
    #[builder(default)]
    guild_ids: Vec<GuildId>,
    /// "Playing ..." status text
    #[builder(default = "\"witchcraft\".to_string()")]
    activity: String,
    /// XP earned per message
    #[builder(default = "10")]
    xp_per_message: i64,
}

/// What to send back for a command.
enum Reply {
    /// Respond with an embed
    Embed { notice: Notice, ephemeral: bool },
    /// Respond with plain text
    Text(String),
    /// The command already responded
    Sent,
}

impl Reply {
    fn public(notice: Notice) -> Self {
        Self::Embed {
            notice,
            ephemeral: false,
        }
    }

    fn private(notice: Notice) -> Self {
        Self::Embed {
            notice,
            ephemeral: true,
        }
    }
}

/// Event handler for the coven bot.
pub struct CovenHandler {
    levels: LevelRepository,
    self_roles: SelfRoleRepository,
    guilds: GuildConfigRepository,
    moderation: ModerationService,
    blacklist: Blacklist,
    settings: HandlerSettings,
}

fn mention(user: UserId) -> String {
    format!("<@{user}>")
}

fn role_mention(role: RoleId) -> String {
    format!("<@&{role}>")
}

fn channel_mention(channel: ChannelId) -> String {
    format!("<#{channel}>")
}

impl CovenHandler {
    /// Create a handler.
    pub fn new(
        levels: LevelRepository,
        self_roles: SelfRoleRepository,
        guilds: GuildConfigRepository,
        moderation: ModerationService,
        blacklist: Blacklist,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            levels,
            self_roles,
            guilds,
            moderation,
            blacklist,
            settings,
        }
    }

    /// Gateway intents the handler relies on.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::GUILD_MODERATION
    }

    /// The moderation service, for shutdown.
    pub fn moderation(&self) -> &ModerationService {
        &self.moderation
    }

    /// Post `notice` to `channel`.
    async fn post(&self, http: &Http, channel: ChannelId, notice: Notice) -> PlatformResult<()> {
        channel
            .to_serenity()
            .send_message(http, CreateMessage::new().embed(CreateEmbed::from(notice)))
            .await?;
        Ok(())
    }

    /// Post `notice` to the announcements channel of each guild that has one.
    pub async fn announce(&self, http: &Http, guild_ids: &[GuildId], notice: Notice) {
        for &guild_id in guild_ids {
            match self.guilds.channel_for(guild_id, &ChannelPurpose::Announce).await {
                Ok(Some(channel)) => {
                    if let Err(e) = self.post(http, channel, notice.clone()).await {
                        warn!(guild_id = %guild_id, error = %e, "Failed to post announcement");
                    }
                }
                Ok(None) => debug!(guild_id = %guild_id, "No announcements channel"),
                Err(e) => error!(guild_id = %guild_id, error = %e, "Failed to look up channel"),
            }
        }
    }

    /// Register slash commands per configured guild, or globally.
    async fn register_commands(&self, http: &Http) {
        if self.settings.guild_ids.is_empty() {
            match Command::set_global_commands(http, definitions()).await {
                Ok(commands) => info!(count = commands.len(), "Registered global commands"),
                Err(e) => error!(error = %e, "Failed to register global commands"),
            }
            return;
        }

        for guild_id in &self.settings.guild_ids {
            match guild_id.to_serenity().set_commands(http, definitions()).await {
                Ok(commands) => {
                    info!(guild_id = %guild_id, count = commands.len(), "Registered commands")
                }
                Err(e) => error!(guild_id = %guild_id, error = %e, "Failed to register commands"),
            }
        }
    }

    /// Award message XP, grant level rewards and announce level-ups.
    #[instrument(skip_all, fields(guild_id = %guild_id, user_id = %msg.author.id))]
    async fn award_xp(&self, ctx: &Context, msg: &Message, guild_id: GuildId) -> CovenResult<()> {
        let user_id = msg.author.id.to_coven();
        let update = self
            .levels
            .add_xp(user_id, guild_id, self.settings.xp_per_message)
            .await?;

        let held = msg
            .member
            .as_ref()
            .map(|member| member.roles.clone())
            .unwrap_or_default();
        let rewards = self
            .guilds
            .level_roles_up_to(guild_id, update.progress.level)
            .await?;
        for role in rewards {
            if held.contains(&role.to_serenity()) {
                continue;
            }
            if let Err(e) = ctx
                .http
                .add_member_role(
                    guild_id.to_serenity(),
                    msg.author.id,
                    role.to_serenity(),
                    Some(LEVEL_REWARD_REASON),
                )
                .await
            {
                warn!(role_id = %role, error = %e, "Failed to grant level role");
            }
        }

        if update.leveled_up {
            info!(level = update.progress.level, "Member leveled up");
            let notice = Notice::level_up(
                &mention(user_id),
                update.progress.level,
                Some(msg.author.face()),
            );
            match self.guilds.channel_for(guild_id, &ChannelPurpose::Level).await? {
                Some(channel) => self.post(&ctx.http, channel, notice).await?,
                None => warn!("Level-up with no level channel configured"),
            }
        }
        Ok(())
    }

    /// Give the join role and post the welcome.
    #[instrument(skip_all, fields(guild_id = %member.guild_id, user_id = %member.user.id))]
    async fn welcome(&self, ctx: &Context, member: &Member) -> CovenResult<()> {
        let guild_id = member.guild_id.to_coven();

        if let Some(role) = self.guilds.join_role(guild_id).await? {
            if let Err(e) = ctx
                .http
                .add_member_role(
                    member.guild_id,
                    member.user.id,
                    role.to_serenity(),
                    Some(JOIN_ROLE_REASON),
                )
                .await
            {
                warn!(role_id = %role, error = %e, "Failed to give join role");
            }
        }

        let Some(channel) = self
            .guilds
            .channel_for(guild_id, &ChannelPurpose::Announce)
            .await?
        else {
            debug!("No announcements channel for welcome");
            return Ok(());
        };

        let template = self.guilds.description(guild_id).await?;
        let listed = self.guilds.listed_channels(guild_id).await?;
        let guild_name = ctx
            .cache
            .guild(member.guild_id)
            .map(|guild| guild.name.clone())
            .unwrap_or_else(|| "the server".to_string());

        let notice = Notice::welcome(
            &member.user.name,
            &guild_name,
            render_welcome(&template, &mention(member.user.id.to_coven())),
            &listed,
            Some(member.user.face()),
        );
        self.post(&ctx.http, channel, notice).await?;
        Ok(())
    }

    /// Post the farewell.
    #[instrument(skip_all, fields(guild_id = %guild_id, user_id = %user.id))]
    async fn farewell(&self, ctx: &Context, guild_id: GuildId, user: &User) -> CovenResult<()> {
        if let Some(channel) = self
            .guilds
            .channel_for(guild_id, &ChannelPurpose::Announce)
            .await?
        {
            let notice = Notice::farewell(&user.name, Some(user.face()));
            self.post(&ctx.http, channel, notice).await?;
        }
        Ok(())
    }

    /// Grant or revoke the role bound to a reaction.
    #[instrument(skip_all, fields(message_id = %reaction.message_id, added = added))]
    async fn self_role(&self, ctx: &Context, reaction: &Reaction, added: bool) -> CovenResult<()> {
        let (Some(guild_id), Some(user_id)) = (reaction.guild_id, reaction.user_id) else {
            return Ok(());
        };
        if user_id == ctx.cache.current_user().id {
            return Ok(());
        }
        if reaction.member.as_ref().is_some_and(|member| member.user.bot) {
            return Ok(());
        }

        let key = emoji_key(&reaction.emoji.to_string());
        let Some(role) = self
            .self_roles
            .role_for(reaction.message_id.to_coven(), &key)
            .await?
        else {
            debug!(emoji = %key, "No role bound to reaction");
            return Ok(());
        };

        let result = if added {
            ctx.http
                .add_member_role(guild_id, user_id, role.to_serenity(), Some(SELF_ROLE_REASON))
                .await
        } else {
            ctx.http
                .remove_member_role(guild_id, user_id, role.to_serenity(), Some(SELF_ROLE_REASON))
                .await
        };
        result.map_err(PlatformError::from)?;
        info!(role_id = %role, user_id = %user_id, "Self-role updated");
        Ok(())
    }

    /// Run a command and produce the reply.
    #[instrument(skip_all, fields(command = %command.data.name, user_id = %command.user.id))]
    async fn run(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        parsed: BotCommand,
    ) -> CovenResult<Reply> {
        let guild_id = command
            .guild_id
            .map(ToCoven::to_coven)
            .ok_or_else(|| CommandError::new(CommandErrorKind::GuildOnly))?;
        let caller = command.user.name.as_str();
        let avatar = |user: UserId| {
            command
                .data
                .resolved
                .users
                .get(&user.to_serenity())
                .map(User::face)
        };

        let reply = match parsed {
            BotCommand::Tempban {
                user,
                duration,
                reason,
            } => {
                let receipt = self
                    .moderation
                    .tempban(guild_id, user, &duration, &reason)
                    .await?;
                Reply::public(
                    Notice::new("Banned!", colours::RED)
                        .with_description(format!(
                            "🔨 {} has been temporarily banned for `{}`",
                            mention(user),
                            receipt.duration()
                        ))
                        .with_author(MODERATION)
                        .with_thumbnail(avatar(user))
                        .with_field("📝 Reason", reason, false)
                        .with_field(
                            "Until",
                            format!("<t:{}:f>", receipt.unban_time().timestamp()),
                            false,
                        )
                        .by(caller),
                )
            }
            BotCommand::Pardon { user, reason } => {
                match self.moderation.pardon(guild_id, user, &reason).await? {
                    PardonOutcome::NoActiveBan => Reply::public(
                        Notice::new("Error", colours::YELLOW)
                            .with_description(format!(
                                "⚠️ No active tempban found for {}.",
                                mention(user)
                            ))
                            .with_author(MODERATION)
                            .by(caller),
                    ),
                    PardonOutcome::Pardoned(outcome) => {
                        let mut notice = Notice::new("Unbanned!", colours::GREEN)
                            .with_description(format!("☑️ You've pardoned {}", mention(user)))
                            .with_author(MODERATION)
                            .with_thumbnail(avatar(user))
                            .with_field("Reason", reason, false);
                        if outcome == UnbanOutcome::AlreadyAbsent {
                            notice =
                                notice.with_field("Note", "They were no longer banned.", false);
                        }
                        Reply::public(notice.by(caller))
                    }
                }
            }
            BotCommand::Kick { user, reason } => {
                self.moderation.kick(guild_id, user, &reason).await?;
                Reply::public(
                    Notice::new("Kicked!", colours::RED)
                        .with_description(format!("⛔ You've kicked {}", mention(user)))
                        .with_author(MODERATION)
                        .with_thumbnail(avatar(user))
                        .with_field("Reason", reason, false)
                        .by(caller),
                )
            }
            BotCommand::Level { user } => {
                let user = user.unwrap_or_else(|| command.user.id.to_coven());
                let progress = self.levels.get(user, guild_id).await?.ok_or_else(|| {
                    CommandError::new(CommandErrorKind::NoLevelData(mention(user)))
                })?;
                Reply::public(
                    Notice::level_check(&mention(user), progress)
                        .with_thumbnail(avatar(user).or_else(|| Some(command.user.face())))
                        .by(caller),
                )
            }
            BotCommand::Reset { user } => {
                if !self.levels.reset(user, guild_id).await? {
                    let kind = CommandErrorKind::NoLevelData(mention(user));
                    return Err(CommandError::new(kind).into());
                }
                Reply::public(
                    Notice::new("Level reset", colours::RED)
                        .with_description(format!(
                            "You successfully reset {} level.",
                            mention(user)
                        ))
                        .with_author(LEVEL)
                        .with_thumbnail(avatar(user))
                        .by(caller),
                )
            }
            BotCommand::SetXp { user, value } => {
                let progress = self.levels.set_xp(user, guild_id, value).await?;
                Reply::public(
                    Notice::level_changed(
                        "XP changed!",
                        format!("You changed {}'s XP.", mention(user)),
                        progress,
                    )
                    .with_thumbnail(avatar(user))
                    .by(caller),
                )
            }
            BotCommand::SetLevel { user, value } => {
                let progress = self.levels.set_level(user, guild_id, value).await?;
                Reply::public(
                    Notice::level_changed(
                        "Level changed!",
                        format!("You changed {}'s level.", mention(user)),
                        progress,
                    )
                    .with_thumbnail(avatar(user))
                    .by(caller),
                )
            }
            BotCommand::AddXp { user, value } => {
                let update = self.levels.add_xp(user, guild_id, value).await?;
                Reply::public(
                    Notice::level_changed(
                        "XP added!",
                        format!("You added {value} to {}'s XP.", mention(user)),
                        update.progress,
                    )
                    .with_thumbnail(avatar(user))
                    .by(caller),
                )
            }
            BotCommand::AddLevel { user, value } => {
                let progress = self.levels.add_levels(user, guild_id, value).await?;
                Reply::public(
                    Notice::level_changed(
                        "Levels added!",
                        format!("You added {value} to {}'s level.", mention(user)),
                        progress,
                    )
                    .with_thumbnail(avatar(user))
                    .by(caller),
                )
            }
            BotCommand::MessageCreate { title, description } => {
                let notice = Notice::new(title, colours::random())
                    .with_description(description)
                    .with_author(ROLE_SYSTEM);
                command
                    .create_response(
                        &ctx.http,
                        CreateInteractionResponse::Message(
                            CreateInteractionResponseMessage::new()
                                .embed(CreateEmbed::from(notice)),
                        ),
                    )
                    .await
                    .map_err(PlatformError::from)?;
                let posted = command
                    .get_response(&ctx.http)
                    .await
                    .map_err(PlatformError::from)?;
                self.self_roles
                    .create_message(posted.id.to_coven(), posted.channel_id.to_coven(), guild_id)
                    .await?;
                info!(message_id = %posted.id, "Self-role message created");
                Reply::Sent
            }
            BotCommand::MessageRoleAdd {
                message,
                role,
                emoji,
            } => {
                let reaction = ReactionType::try_from(emoji.as_str())
                    .map_err(|_| CommandError::invalid("emoji", "not an emoji"))?;
                let key = emoji_key(&emoji);
                let registered = self.self_roles.message(message).await?;
                let channel = self_role_channel(registered.as_ref(), guild_id)?;
                let target = channel
                    .to_serenity()
                    .message(&ctx.http, message.to_serenity())
                    .await
                    .map_err(PlatformError::from)?;
                target
                    .react(&ctx.http, reaction.clone())
                    .await
                    .map_err(PlatformError::from)?;

                // Take the bot's reaction back if the binding cannot be stored.
                let bound = self.self_roles.add_role(message, role, &key).await;
                if !matches!(bound, Ok(true)) {
                    if let Err(e) = target.delete_reaction(&ctx.http, None, reaction).await {
                        warn!(error = %e, "Failed to withdraw reaction");
                    }
                }
                if !bound? {
                    return Err(CommandError::invalid("message", "not a self-role message").into());
                }
                Reply::private(Notice::success(
                    ROLE_SYSTEM,
                    "Success!",
                    format!("{emoji} {} has been added!", role_mention(role)),
                ))
            }
            BotCommand::MessageRoleRemove { message, role } => {
                let Some(key) = self.self_roles.emoji_for(message, role).await? else {
                    return Err(
                        CommandError::invalid("role", "not bound to that message").into()
                    );
                };
                match command
                    .channel_id
                    .message(&ctx.http, message.to_serenity())
                    .await
                {
                    Ok(target) => {
                        if let Err(e) = target
                            .delete_reaction_emoji(&ctx.http, reaction_for_key(&key))
                            .await
                        {
                            warn!(error = %e, "Failed to clear reactions");
                        }
                    }
                    Err(e) => warn!(error = %e, "Self-role message not found"),
                }
                self.self_roles.remove_role(message, role).await?;
                Reply::private(Notice::success(
                    ROLE_SYSTEM,
                    "Removed role",
                    format!(
                        "You successfully removed {} from the message",
                        role_mention(role)
                    ),
                ))
            }
            BotCommand::MessageRoleReset => {
                let removed = self.self_roles.reset(guild_id).await?;
                Reply::public(
                    Notice::new("Reset roles!", colours::RED)
                        .with_description(format!("Reset all the roles ({removed} removed)."))
                        .with_author(ROLE_SYSTEM)
                        .with_thumbnail(Some(command.user.face())),
                )
            }
            BotCommand::ChannelSet { purpose, channel } => {
                let channel = channel.unwrap_or_else(|| command.channel_id.to_coven());
                self.guilds.set_channel(guild_id, &purpose, channel).await?;
                let (title, description) = match &purpose {
                    ChannelPurpose::Level => (
                        "Level channel set",
                        format!("You've set {} as level channel.", channel_mention(channel)),
                    ),
                    ChannelPurpose::Announce => (
                        "Announcements channel set",
                        format!(
                            "You've set {} as announcements channel.",
                            channel_mention(channel)
                        ),
                    ),
                    ChannelPurpose::Listed(_) => (
                        "New channel added!",
                        format!(
                            "You've added {} to the channel list.",
                            channel_mention(channel)
                        ),
                    ),
                };
                let mut notice = Notice::success(SERVER_SYSTEM, title, description).by(caller);
                if let ChannelPurpose::Listed(label) = &purpose {
                    notice = notice.with_field("Description", label, false);
                }
                Reply::private(notice)
            }
            BotCommand::ChannelAnnounce {
                title,
                value,
                author,
            } => {
                let channel = self
                    .guilds
                    .channel_for(guild_id, &ChannelPurpose::Announce)
                    .await?
                    .ok_or_else(|| {
                        CommandError::invalid("channel", "no announcements channel is set")
                    })?;
                let notice = Notice::new(title, colours::random())
                    .with_description(value)
                    .with_author(author.unwrap_or_else(|| SERVER_SYSTEM.to_string()))
                    .by(caller);
                self.post(&ctx.http, channel, notice).await?;
                Reply::private(Notice::success(
                    SERVER_SYSTEM,
                    "Announcement sent",
                    format!("Posted in {}.", channel_mention(channel)),
                ))
            }
            BotCommand::ChannelDescription { value } => {
                self.guilds.set_description(guild_id, &value).await?;
                Reply::private(
                    Notice::success(
                        SERVER_SYSTEM,
                        "New description set",
                        "You've changed the welcome message description",
                    )
                    .by(caller),
                )
            }
            BotCommand::OnJoinRole { role } => {
                self.guilds.set_join_role(guild_id, role).await?;
                Reply::private(
                    Notice::success(
                        SERVER_SYSTEM,
                        "Success!",
                        "You've successfully set the new on join role",
                    )
                    .by(caller),
                )
            }
            BotCommand::LevelRole { role, level } => {
                self.guilds.set_level_role(guild_id, role, level).await?;
                Reply::private(
                    Notice::success(
                        SERVER_SYSTEM,
                        "Level role successfully created!",
                        format!(
                            "You've successfully set {} for level: {level}",
                            role_mention(role)
                        ),
                    )
                    .by(caller),
                )
            }
            BotCommand::Dice { minimum, maximum } => {
                let rolled = roll_dice(&mut rand::thread_rng(), minimum, maximum).ok_or_else(
                    || CommandError::invalid("maximum", "must not be lower than minimum"),
                )?;
                Reply::Text(format!("You rolled a {rolled}!"))
            }
            BotCommand::Rps { hand } => {
                let mine = Hand::random(&mut rand::thread_rng());
                let verdict = match hand.versus(mine) {
                    Outcome::Draw => "You chose the same action.",
                    Outcome::Win => "You won!",
                    Outcome::Lose => "You lost.",
                };
                Reply::Text(format!("I played {mine}. {verdict}"))
            }
        };
        Ok(reply)
    }

    /// Acknowledge a command whose reply will take a while.
    ///
    /// Returns whether the acknowledgement went through.
    async fn defer(&self, ctx: &Context, command: &CommandInteraction) -> bool {
        match command.defer(&ctx.http).await {
            Ok(()) => true,
            Err(e) => {
                warn!(command = %command.data.name, error = %e, "Failed to defer command");
                false
            }
        }
    }

    /// Send the reply for a command, editing the placeholder if it was deferred.
    async fn respond(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        reply: Reply,
        deferred: bool,
    ) {
        let sent = if deferred {
            let edit = match reply {
                Reply::Sent => return,
                Reply::Text(text) => EditInteractionResponse::new().content(text),
                Reply::Embed { notice, .. } => {
                    EditInteractionResponse::new().embed(CreateEmbed::from(notice))
                }
            };
            command.edit_response(&ctx.http, edit).await.map(|_| ())
        } else {
            let message = match reply {
                Reply::Sent => return,
                Reply::Text(text) => CreateInteractionResponseMessage::new().content(text),
                Reply::Embed { notice, ephemeral } => CreateInteractionResponseMessage::new()
                    .embed(CreateEmbed::from(notice))
                    .ephemeral(ephemeral),
            };
            command
                .create_response(&ctx.http, CreateInteractionResponse::Message(message))
                .await
        };
        if let Err(e) = sent {
            error!(command = %command.data.name, error = %e, "Failed to respond to command");
        }
    }

    /// Tell the caller a command failed.
    ///
    /// A deferred placeholder is replaced with the error. Otherwise the error
    /// is sent privately, as a followup if the command already responded.
    async fn respond_error(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        description: String,
        deferred: bool,
    ) {
        let embed = CreateEmbed::from(Notice::error(description));
        if deferred {
            let edit = EditInteractionResponse::new().embed(embed);
            if let Err(e) = command.edit_response(&ctx.http, edit).await {
                error!(command = %command.data.name, error = %e, "Failed to report command error");
            }
            return;
        }

        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .embed(embed.clone())
                .ephemeral(true),
        );
        if command.create_response(&ctx.http, response).await.is_ok() {
            return;
        }
        let followup = CreateInteractionResponseFollowup::new()
            .embed(embed)
            .ephemeral(true);
        if let Err(e) = command.create_followup(&ctx.http, followup).await {
            error!(command = %command.data.name, error = %e, "Failed to report command error");
        }
    }
}

#[async_trait]
impl EventHandler for CovenHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );

        ctx.set_activity(Some(ActivityData::playing(self.settings.activity.clone())));
        self.register_commands(&ctx.http).await;

        let guild_ids: Vec<GuildId> = ready.guilds.iter().map(|g| g.id.to_coven()).collect();
        self.announce(&ctx.http, &guild_ids, Notice::ready()).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id.map(ToCoven::to_coven) else {
            return;
        };

        if self.blacklist.matches(&msg.content) {
            info!(guild_id = %guild_id, user_id = %msg.author.id, "Deleting blacklisted message");
            if let Err(e) = msg.delete(&ctx.http).await {
                warn!(error = %e, "Failed to delete blacklisted message");
            }
            return;
        }

        if let Err(e) = self.award_xp(&ctx, &msg, guild_id).await {
            error!(guild_id = %guild_id, error = %e, "Failed to award XP");
        }
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        info!(
            guild_id = %new_member.guild_id,
            user_id = %new_member.user.id,
            username = %new_member.user.name,
            "Member joined guild"
        );
        if let Err(e) = self.welcome(&ctx, &new_member).await {
            error!(error = %e, "Failed to welcome member");
        }
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: serenity::all::GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        info!(
            guild_id = %guild_id,
            user_id = %user.id,
            username = %user.name,
            "Member left guild"
        );
        if let Err(e) = self.farewell(&ctx, guild_id.to_coven(), &user).await {
            error!(error = %e, "Failed to post farewell");
        }
    }

    async fn reaction_add(&self, ctx: Context, add_reaction: Reaction) {
        if let Err(e) = self.self_role(&ctx, &add_reaction, true).await {
            error!(error = %e, "Failed to grant self-role");
        }
    }

    async fn reaction_remove(&self, ctx: Context, removed_reaction: Reaction) {
        if let Err(e) = self.self_role(&ctx, &removed_reaction, false).await {
            error!(error = %e, "Failed to revoke self-role");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        let input = CommandInput::from_interaction(&command.data);
        info!(command = %input.path(), user = %command.user.name, "Received slash command");

        let mut deferred = false;
        let outcome = match BotCommand::parse(&input) {
            Ok(parsed) => {
                if parsed.defers_response() {
                    deferred = self.defer(&ctx, &command).await;
                }
                self.run(&ctx, &command, parsed).await
            }
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(reply) => self.respond(&ctx, &command, reply, deferred).await,
            Err(e) => {
                warn!(command = %input.path(), error = %e, "Command failed");
                self.respond_error(&ctx, &command, e.user_message(), deferred).await;
            }
        }
    }
}
