//! Request Form Modal
//!
//! Create or edit a purchase request. Validates locally, then hands the
//! payload to the parent, which performs the request.

use leptos::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::context::AppContext;
use crate::models::{NewRequest, Request};
use crate::store::ReferenceDataStoreFields;
use crate::validation::{validate_request, FieldErrors, RequestForm};

fn form_from(request: &Request) -> RequestForm {
    RequestForm {
        item_name: request.item_name.clone(),
        catalog_number: request.catalog_number.clone().unwrap_or_default(),
        vendor: request.vendor.clone().unwrap_or_default(),
        quantity: request.quantity.to_string(),
        unit_price: request.unit_price.map(|p| p.to_string()).unwrap_or_default(),
        fund: request.fund.map(|f| f.to_string()).unwrap_or_default(),
        notes: request.notes.clone().unwrap_or_default(),
    }
}

#[component]
pub fn RequestFormModal(
    /// Request being edited; None creates a new one
    initial: Option<Request>,
    #[prop(into)] on_submit: Callback<NewRequest>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let title = if initial.is_some() { "Edit request" } else { "New request" };
    let quantity_default = RequestForm { quantity: "1".into(), ..Default::default() };
    let (form, set_form) = signal(initial.as_ref().map(form_from).unwrap_or(quantity_default));
    let (errors, set_errors) = signal(FieldErrors::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match form.with(validate_request) {
            Ok(request) => {
                set_errors.set(FieldErrors::new());
                on_submit.run(request);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    let funds = move || ctx.reference.funds().get();

    view! {
        <Modal title=title on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <label>
                    "Item name"
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.item_name.clone())
                        on:input=move |ev| set_form.update(|f| f.item_name = event_target_value(&ev))
                    />
                </label>
                <FieldError errors=errors field="item_name" />

                <div class="form-row">
                    <label>
                        "Catalog #"
                        <input
                            type="text"
                            prop:value=move || form.with(|f| f.catalog_number.clone())
                            on:input=move |ev| set_form.update(|f| f.catalog_number = event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Vendor"
                        <input
                            type="text"
                            prop:value=move || form.with(|f| f.vendor.clone())
                            on:input=move |ev| set_form.update(|f| f.vendor = event_target_value(&ev))
                        />
                    </label>
                </div>

                <div class="form-row">
                    <label>
                        "Quantity"
                        <input
                            type="number"
                            min="1"
                            step="1"
                            prop:value=move || form.with(|f| f.quantity.clone())
                            on:input=move |ev| set_form.update(|f| f.quantity = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="quantity" />
                    </label>
                    <label>
                        "Unit price"
                        <input
                            type="text"
                            inputmode="decimal"
                            placeholder="0.00"
                            prop:value=move || form.with(|f| f.unit_price.clone())
                            on:input=move |ev| set_form.update(|f| f.unit_price = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="unit_price" />
                    </label>
                </div>

                <label>
                    "Fund"
                    <select
                        prop:value=move || form.with(|f| f.fund.clone())
                        on:change=move |ev| set_form.update(|f| f.fund = event_target_value(&ev))
                    >
                        <option value="">"No fund"</option>
                        {move || funds().into_iter().map(|fund| {
                            let label = match &fund.code {
                                Some(code) => format!("{} ({})", fund.name, code),
                                None => fund.name.clone(),
                            };
                            view! { <option value=fund.id.to_string()>{label}</option> }
                        }).collect_view()}
                    </select>
                </label>
                <FieldError errors=errors field="fund" />

                <label>
                    "Notes"
                    <textarea
                        rows="3"
                        prop:value=move || form.with(|f| f.notes.clone())
                        on:input=move |ev| set_form.update(|f| f.notes = event_target_value(&ev))
                    ></textarea>
                </label>

                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error />
            </form>
        </Modal>
    }
}
