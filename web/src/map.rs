use mirage_core::{LevelProgress, LevelStatus};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct LevelNodeProps {
    progress: LevelProgress,
    callback: Callback<usize>,
}

#[function_component(LevelNode)]
fn level_node(props: &LevelNodeProps) -> Html {
    let LevelNodeProps { progress, callback } = props.clone();
    let playable = progress.status.is_playable();

    let class = classes!(
        "node",
        match progress.status {
            LevelStatus::Completed => "completed",
            LevelStatus::Current => "current",
            LevelStatus::Locked => "locked",
        },
        if progress.level_index % 2 == 0 { "left" } else { "right" }
    );

    let onclick = Callback::from(move |_: MouseEvent| {
        if playable {
            callback.emit(progress.level_index);
        } else {
            log::debug!("level {} is locked", progress.display_number);
        }
    });

    html! {
        <li {class} {onclick}>
            <span class="number">{progress.display_number}</span>
            {
                match progress.status {
                    LevelStatus::Completed => html! { <span class="badge">{"✓"}</span> },
                    LevelStatus::Current => html! { <span class="badge">{"⚑"}</span> },
                    LevelStatus::Locked => html! { <span class="badge">{"🔒"}</span> },
                }
            }
        </li>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct LevelMapProps {
    pub title: AttrValue,
    pub levels: Vec<LevelProgress>,
    pub on_select: Callback<usize>,
    pub on_resume: Callback<()>,
    pub on_reset: Callback<()>,
}

/// Ladder overview: finished levels, the current one, and what is still
/// locked. Only unlocked levels can be opened.
#[function_component(LevelMapView)]
pub(crate) fn level_map(props: &LevelMapProps) -> Html {
    let on_resume = props.on_resume.clone();
    let on_reset = props.on_reset.clone();
    let completed = props
        .levels
        .iter()
        .filter(|progress| progress.status == LevelStatus::Completed)
        .count();

    html! {
        <div class="mirage map">
            <header>
                <h1>{props.title.clone()}</h1>
                <small>{format!("{} / {} levels completed", completed, props.levels.len())}</small>
            </header>
            <ol class="path">
                {
                    for props.levels.iter().map(|&progress| html! {
                        <LevelNode {progress} callback={props.on_select.clone()}/>
                    })
                }
            </ol>
            <footer>
                <button onclick={Callback::from(move |_: MouseEvent| on_resume.emit(()))}>{"Play"}</button>
                <button class="reset" onclick={Callback::from(move |_: MouseEvent| on_reset.emit(()))}>{"Start over"}</button>
            </footer>
        </div>
    }
}
