use super::CommandError;
use crate::capture::{Camera, CaptureDevice};
use crate::form::NewRecordForm;
use crate::pipeline::structuring::{HealthAssistant, MedicationIdentification};

/// Identify the medication in the form's photo and fill title and description.
///
/// On failure the form is left as it was.
pub fn identify_medication(
    assistant: &HealthAssistant,
    form: &mut NewRecordForm,
) -> Result<MedicationIdentification, CommandError> {
    let image = form.image.as_deref().ok_or(CommandError::NoImage)?;
    let identification = assistant.identify_medication(image)?;
    form.apply_identification(identification.clone());
    Ok(identification)
}

/// Take one photo and attach it to the form. The camera is released
/// before this returns, whether or not the capture succeeded.
pub fn capture_into_form<D: CaptureDevice>(
    camera: &mut Camera<D>,
    form: &mut NewRecordForm,
) -> Result<(), CommandError> {
    let data_url = camera.open()?.capture_photo()?;
    tracing::debug!(size = data_url.len(), "Photo attached to form");
    form.attach_image(data_url);
    Ok(())
}
