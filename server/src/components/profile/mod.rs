use maud::{html, Markup, Render as _};

use crate::components::ui::avatar::Avatar;
use crate::profile::ProfileContext;
use crate::store::{PostRecord, ProfileCard, UserRecord};

/// Which list a profile screen is showing, with the fetched rows.
pub enum ProfileTab<'a> {
    Posts(&'a [PostRecord]),
    Followers(&'a [ProfileCard]),
    Following(&'a [ProfileCard]),
}

impl ProfileTab<'_> {
    pub fn slug(&self) -> &'static str {
        match self {
            ProfileTab::Posts(_) => "posts",
            ProfileTab::Followers(_) => "followers",
            ProfileTab::Following(_) => "following",
        }
    }
}

/// Profile banner: avatar, username, and the follow/unfollow control when the
/// visitor is signed in and looking at someone else's profile.
pub fn profile_header(
    owner: &UserRecord,
    ctx: &ProfileContext,
    visitor_logged_in: bool,
) -> Markup {
    html! {
        div class="flex items-center gap-4 px-6 py-5 bg-gradient-to-r from-amber-100 to-orange-100" {
            (Avatar::new(&owner.avatar_url, &owner.username).size("w-16 h-16").render())

            h2 class="text-2xl font-bold text-gray-800" { (owner.username) }

            @if visitor_logged_in && !ctx.is_visitors_profile {
                @if ctx.is_following {
                    form method="post" action={"/unfollow/" (owner.username)} {
                        button type="submit" class="ml-auto px-4 py-2 rounded-md bg-rose-600 text-white text-sm" {
                            "Stop Following"
                        }
                    }
                } @else {
                    form method="post" action={"/follow/" (owner.username)} {
                        button type="submit" class="ml-auto px-4 py-2 rounded-md bg-emerald-600 text-white text-sm" {
                            "Follow"
                        }
                    }
                }
            }
        }
    }
}

pub fn profile_tabs(username: &str, current: &str, ctx: &ProfileContext) -> Markup {
    let tab = |href: String, slug: &str, label: String| {
        let classes = if slug == current {
            "px-4 py-2 text-sm font-semibold text-orange-700 border-b-2 border-orange-600"
        } else {
            "px-4 py-2 text-sm text-gray-600 hover:text-orange-700"
        };
        html! { a href=(href) class=(classes) { (label) } }
    };

    html! {
        nav class="flex border-b border-gray-200 px-4" {
            (tab(format!("/profile/{username}"), "posts", format!("Posts: {}", ctx.post_count)))
            (tab(format!("/profile/{username}/followers"), "followers", format!("Followers: {}", ctx.follower_count)))
            (tab(format!("/profile/{username}/following"), "following", format!("Following: {}", ctx.following_count)))
        }
    }
}

pub fn post_list(posts: &[PostRecord]) -> Markup {
    html! {
        @if posts.is_empty() {
            p class="px-6 py-8 text-sm text-gray-500" { "No posts yet." }
        } @else {
            ul class="divide-y divide-gray-100" {
                @for post in posts {
                    li class="post-item px-6 py-4" {
                        div class="flex items-center gap-2" {
                            (Avatar::new(&post.author_avatar_url, &post.author_username).size("w-6 h-6").render())
                            span class="text-sm font-medium text-gray-700" { (post.author_username) }
                            span class="text-xs text-gray-400" {
                                (post.created_at_utc.format("%-d %B %Y"))
                            }
                        }
                        h3 class="mt-1 text-base font-semibold text-gray-800" { (post.title) }
                        p class="mt-1 text-sm text-gray-600" { (post.body) }
                    }
                }
            }
        }
    }
}

pub fn card_list(cards: &[ProfileCard]) -> Markup {
    html! {
        @if cards.is_empty() {
            p class="px-6 py-8 text-sm text-gray-500" { "Nobody here yet." }
        } @else {
            ul class="divide-y divide-gray-100" {
                @for card in cards {
                    li class="profile-card flex items-center gap-3 px-6 py-3" {
                        (Avatar::new(&card.avatar_url, &card.username).size("w-8 h-8").render())
                        a href={"/profile/" (card.username)} class="text-sm font-medium text-orange-700 hover:underline" {
                            (card.username)
                        }
                    }
                }
            }
        }
    }
}
