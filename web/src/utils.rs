use gloo::storage::{LocalStorage, Storage};
use serde::{Serialize, de::DeserializeOwned};
use yew::prelude::*;

/// Where a value lives in `localStorage`. Bump the version suffix when the
/// stored shape changes.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T> LocalOrDefault for T
where
    T: StorageKey + Default + Serialize + DeserializeOwned,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_default()
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("failed to save {}: {}", T::KEY, err);
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attach the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(
        html! { <div class="overlay"><div class="popup">{props.children.clone()}</div></div> },
        modal_host.into(),
    )
}

/// Countdown text like `00:07`.
pub(crate) fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(7), "00:07");
        assert_eq!(format_clock(20), "00:20");
        assert_eq!(format_clock(75), "01:15");
    }
}
